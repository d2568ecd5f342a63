mod common;

use common::*;
use efetivo_report::output::{self, SUMMARY_FILE};
use efetivo_report::reports::{generate_summary, Dashboard};
use efetivo_report::{ingest_directory, PipelineConfig, Selection, SiteSelection};

#[test]
fn dashboard_export_writes_reports_and_summary() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_workbook(
        &input.path().join("01.Janeiro.xlsx"),
        &[COMPANY, SEX, NAME, TYPE, PRODUCTION, NET, ADVANCE],
        &[
            vec![Text("Obra A"), Text("F"), Text("Ana"), Text("Direct"), Num(100.0), Num(500.0), Num(100.0)],
            vec![Text("Obra B"), Text("M"), Text("Caio"), Text("Indirect"), Num(10.0), Num(50.0), Num(50.0)],
        ],
    );
    std::fs::write(input.path().join("bad.xlsx"), b"garbage").unwrap();

    let ingestion = ingest_directory(input.path(), &PipelineConfig::default());
    let table = ingestion.table().unwrap();
    let selection = Selection::everything(table).with_site(SiteSelection::from_arg("Obra A"));
    let dashboard = Dashboard::build(table, &selection);
    let summary = generate_summary(&ingestion, table, &dashboard);

    let reports_dir = out.path().join("reports");
    let paths = output::export_dashboard(&reports_dir, &dashboard, &summary).unwrap();
    assert_eq!(paths.len(), 6);
    assert!(paths.iter().all(|p| p.exists()));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(reports_dir.join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(json["total_rows"], 2);
    assert_eq!(json["filtered_rows"], 1);
    assert_eq!(json["files_found"], 2);
    assert_eq!(json["skipped_files"][0], "bad.xlsx");
    assert_eq!(json["avg_production_weight"], 0.25);
    assert_eq!(json["undefined_ratio_rows"], 0);

    let by_period = std::fs::read_to_string(&paths[0]).unwrap();
    assert!(by_period.starts_with("MonthNumber,Month,Type,Headcount"));
    assert!(by_period.contains("1,Janeiro,Indirect,1"));
}
