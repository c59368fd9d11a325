mod common;

use encoding_rs::{UTF_8, WINDOWS_1252};

use csv_autoreport::{
    AnalysisOptions, ColumnRole, MetricKey, NumericRole, Report, io_utils, table::Table,
};

use common::{TestWorkspace, fixture_path};

fn load_sales() -> Table {
    let path = fixture_path("sales.csv");
    assert!(path.exists(), "fixture missing: {path:?}");
    let delimiter = io_utils::resolve_input_delimiter(&path, None);
    Table::load(&path, delimiter, UTF_8).expect("load sales fixture")
}

#[test]
fn sales_fixture_is_classified_by_role() {
    let mut table = load_sales();
    let report = Report::build(&mut table, &AnalysisOptions::default());
    let classification = &report.classification;

    assert_eq!(classification.dates, vec!["Date"]);
    assert_eq!(classification.numeric, vec!["Units", "Revenue"]);
    assert_eq!(classification.categories, vec!["Region", "Customer"]);
    assert_eq!(classification.role_of("Revenue"), Some(ColumnRole::Currency));
    assert_eq!(classification.numeric_roles["Units"], NumericRole::Count);
}

#[test]
fn sales_fixture_metrics() {
    let mut table = load_sales();
    let report = Report::build(&mut table, &AnalysisOptions::default());
    let metrics = &report.metrics;

    assert_eq!(metrics[&MetricKey::TotalRevenue].value, 2200.0);
    assert_eq!(metrics[&MetricKey::TotalOrders].value, 20.0);
    assert_eq!(metrics[&MetricKey::TotalOrders].label, "Total Units");
    assert_eq!(metrics[&MetricKey::Aov].value, 110.0);
    assert_eq!(metrics[&MetricKey::TotalRecords].value, 14.0);
    assert_eq!(metrics[&MetricKey::UniqueCustomers].value, 3.0);
    assert!((metrics[&MetricKey::Growth].value - 20.0).abs() < 1e-9);
}

#[test]
fn sales_fixture_series_and_insights() {
    let mut table = load_sales();
    let report = Report::build(&mut table, &AnalysisOptions::default());

    let line = report.charts.line.as_ref().expect("line series");
    assert_eq!(line.title, "Revenue Over Time");
    assert_eq!(line.labels.len(), 14);
    assert_eq!(line.labels.first().map(String::as_str), Some("2024-01-01"));
    assert_eq!(line.values.last(), Some(&150.0));

    let pie = report.charts.pie.as_ref().expect("pie series");
    assert_eq!(pie.title, "Revenue by Region");
    assert_eq!(pie.labels, vec!["North", "South", "East", "West"]);
    assert_eq!(pie.values, vec![900.0, 650.0, 400.0, 250.0]);

    let bar = report.charts.bar.as_ref().expect("bar series");
    assert_eq!(bar.title, "Top 10 Region");
    assert_eq!(bar.labels, pie.labels);

    assert_eq!(
        report.insights,
        vec![
            "✅ Total revenue: $2,200.00",
            "📈 Growth vs last week: +20.0%",
            "💰 Average order value: $110.00",
            "🏆 Top category: North ($900.00)",
        ]
    );
}

#[test]
fn report_without_dates_keeps_category_series() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "no_dates.csv",
        "segment,amount\nretail,\"$1,200\"\nonline,$950\nretail,\"$3,100\"\n",
    );
    let mut table = Table::load(&path, b',', UTF_8).expect("load");
    let report = Report::build(&mut table, &AnalysisOptions::default());

    assert!(report.charts.line.is_none());
    assert_eq!(report.metrics[&MetricKey::TotalRevenue].value, 5250.0);
    let pie = report.charts.pie.expect("pie series");
    assert_eq!(pie.labels, vec!["retail", "online"]);
    assert_eq!(pie.values, vec![4300.0, 950.0]);
    assert!(report.charts.bar.is_some());
    assert!(!report.metrics.contains_key(&MetricKey::Growth));
}

#[test]
fn tsv_and_legacy_encodings_load() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("ventas.tsv");
    let (encoded, _, _) = WINDOWS_1252.encode("fecha\tcategoría\tventa\n2024-03-01\tCafé\t10\n");
    std::fs::write(&path, &encoded).expect("write encoded input");

    let delimiter = io_utils::resolve_input_delimiter(&path, None);
    let mut table = Table::load(&path, delimiter, WINDOWS_1252).expect("load");
    let report = Report::build(&mut table, &AnalysisOptions::default());

    assert_eq!(report.classification.dates, vec!["fecha"]);
    assert_eq!(report.classification.categories, vec!["categoría"]);
    assert_eq!(
        report.classification.role_of("venta"),
        Some(ColumnRole::Currency)
    );
    let pie = report.charts.pie.expect("pie series");
    assert_eq!(pie.labels, vec!["Café"]);
}

#[test]
fn top_categories_option_caps_series() {
    let mut table = load_sales();
    let options = AnalysisOptions {
        top_categories: 2,
        ..AnalysisOptions::default()
    };
    let report = Report::build(&mut table, &options);
    let bar = report.charts.bar.expect("bar series");
    assert_eq!(bar.title, "Top 2 Region");
    assert_eq!(bar.labels, vec!["North", "South"]);
}
