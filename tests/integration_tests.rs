use powerlifting_percentiles::analyzers::analyzer::analyze;
use powerlifting_percentiles::archive::load_csv;
use powerlifting_percentiles::config::BucketConfig;
use powerlifting_percentiles::output::write_table;
use serde_json::Value;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn sample_csv() -> String {
    let mut csv = String::from(
        "Name,Sex,Event,Equipment,Age,BodyweightKg,Best3SquatKg,Best3BenchKg,Best3DeadliftKg,TotalKg\n",
    );

    // 60 open-age men at 80kg; only the first 40 bench
    for i in 0..60 {
        let bench = if i < 40 { format!("{}", 60 + i) } else { String::new() };
        csv.push_str(&format!("M{i},M,SBD,Raw,25,80.4,{},{bench},,\n", 100 + i));
    }
    // 55 women at 60kg: 35 masters, 20 open
    for i in 0..55 {
        let age = if i < 35 { "45" } else { "25" };
        csv.push_str(&format!("F{i},F,D,Raw,{age},60,,,{},\n", 120 + i));
    }
    // noise that must not reach any bucket
    csv.push_str("X,Mx,SBD,Raw,30,90,200,150,250,600\n");
    csv.push_str("Y,M,SBD,Raw,30,,200,150,250,600\n");
    csv.push_str("Z,M,SBD,Raw,30,90,-200,-150,-250,0\n");
    // ragged row: trailing cells missing, squat still counts
    csv.push_str("Short,M,SBD,Raw,25,80.4,300\n");
    csv
}

fn build_zip(csv: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("README.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"OpenPowerlifting sample").unwrap();
    writer
        .start_file(
            "openpowerlifting-2026-10-18/openpowerlifting-2026-10-18-abc.csv",
            SimpleFileOptions::default(),
        )
        .unwrap();
    writer.write_all(csv.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_full_pipeline() {
    let zip = build_zip(&sample_csv());
    let payload = load_csv("openpowerlifting-latest.zip", &zip).expect("Failed to extract CSV");
    let (table, stats) = analyze(payload.data.as_slice(), &BucketConfig::default()).unwrap();

    assert_eq!(stats.rows, 119);
    assert_eq!(stats.included, 116);
    assert_eq!(stats.malformed, 0);

    let path = std::env::temp_dir().join("powerlifting_percentiles_integration.json");
    write_table(&path, &table, true).unwrap();
    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(json["metadata"]["lifter_count"], 116);
    assert_eq!(json["metadata"]["units"], "kg");

    // men: only the 83kg class exists
    let male = json["male"].as_object().unwrap();
    assert_eq!(male.keys().collect::<Vec<_>>(), vec!["83"]);
    let wc = &json["male"]["83"];
    assert_eq!(wc["all_ages"]["squat"]["count"], 61);
    // index = 60 * 0.5 = 30 -> 130
    assert_eq!(wc["all_ages"]["squat"]["percentiles"]["50"], 130.0);
    // 40 benches: under the all-ages minimum, over the age-bracket minimum
    assert!(wc["all_ages"].get("bench").is_none());
    assert_eq!(wc["by_age"]["open"]["bench"]["count"], 40);
    assert_eq!(wc["by_age"]["open"]["squat"]["count"], 61);

    // women: 63kg class, masters bracket only
    let wc = &json["female"]["63"];
    assert_eq!(wc["all_ages"]["deadlift"]["count"], 55);
    assert!(wc["all_ages"].get("squat").is_none());
    let brackets: Vec<_> = wc["by_age"].as_object().unwrap().keys().collect();
    assert_eq!(brackets, vec!["masters_40"]);
    assert_eq!(wc["by_age"]["masters_40"]["deadlift"]["count"], 35);
    assert_eq!(wc["by_age"]["masters_40"]["deadlift"]["percentiles"]["99"], 153.7);
}

#[test]
fn test_plain_csv_source() {
    let csv = sample_csv();
    let payload = load_csv("local/openpowerlifting.csv", csv.as_bytes()).unwrap();
    let (table, _) = analyze(payload.data.as_slice(), &BucketConfig::default()).unwrap();

    assert_eq!(table.male.len(), 1);
    assert_eq!(table.female.len(), 1);
}
