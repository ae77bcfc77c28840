//! Chart-XML fixer over an unpacked presentation directory.
//!
//! Run with: cargo test --test fix_charts

use pptxhtml::fixer::fix_charts_in_dir;
use std::fs;
use std::path::Path;

const BAR_CHART: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><c:date1904 val="0"/><c:chart><c:plotArea><c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:ser><c:idx val="0"/><c:spPr><a:ln><a:solidFill><a:schemeClr val="bg1"/></a:solidFill></a:ln></c:spPr></c:ser><c:gapWidth val="150"/></c:barChart><c:valAx><c:majorGridlines/><c:majorTickMark val="out"/></c:valAx></c:plotArea><c:legend><c:legendPos val="r"/></c:legend></c:chart></c:chartSpace>"#;

const DOUGHNUT_CHART: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><c:chart><c:plotArea><c:doughnutChart><c:ser><c:idx val="0"/><c:spPr><a:ln w="19050"><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></a:ln></c:spPr></c:ser><c:holeSize val="50"/></c:doughnutChart></c:plotArea></c:chart></c:chartSpace>"#;

fn unpacked(dir: &Path) {
    let charts = dir.join("ppt").join("charts");
    fs::create_dir_all(charts.join("_rels")).unwrap();
    fs::create_dir_all(dir.join("ppt").join("slides")).unwrap();
    fs::write(charts.join("chart1.xml"), BAR_CHART).unwrap();
    fs::write(charts.join("chart2.xml"), DOUGHNUT_CHART).unwrap();
    fs::write(charts.join("style1.xml"), "<cs:chartStyle/>").unwrap();
    fs::write(charts.join("_rels").join("chart1.xml.rels"), "<Relationships/>").unwrap();
}

#[test]
fn test_fixes_bar_chart_and_keeps_doughnut_ring() {
    let temp = tempfile::tempdir().unwrap();
    unpacked(temp.path());
    let ppt = temp.path().join("ppt");

    let report = fix_charts_in_dir(&ppt);
    assert!(report.success);
    assert_eq!(report.total_charts, 2);
    // The doughnut's legend is absent and its border is kept, but rounded
    // corners are still switched off.
    assert_eq!(report.charts_fixed, 2);

    let bar = fs::read_to_string(ppt.join("charts").join("chart1.xml")).unwrap();
    assert!(bar.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
    assert!(bar.contains(r#"<c:gapWidth val="219"/>"#));
    assert!(bar.contains(r#"<a:ln w="9525"><a:solidFill><a:srgbClr val="D9D9D9"/></a:solidFill></a:ln>"#));
    assert!(bar.contains("<a:ln><a:noFill/></a:ln>"));
    assert!(bar.contains(r#"<c:legendPos val="b"/>"#));
    assert!(bar.contains(r#"<c:majorTickMark val="none"/>"#));
    assert!(bar.contains(r#"<c:roundedCorners val="0"/>"#));

    let doughnut = fs::read_to_string(ppt.join("charts").join("chart2.xml")).unwrap();
    assert!(doughnut.contains(r#"<a:srgbClr val="FFFFFF"/>"#));

    let style = fs::read_to_string(ppt.join("charts").join("style1.xml")).unwrap();
    assert_eq!(style, "<cs:chartStyle/>");
}

#[test]
fn test_second_pass_changes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    unpacked(temp.path());
    let ppt = temp.path().join("ppt");

    fix_charts_in_dir(&ppt);
    let first = fs::read_to_string(ppt.join("charts").join("chart1.xml")).unwrap();
    let report = fix_charts_in_dir(&ppt);
    assert_eq!(report.charts_fixed, 0);
    assert_eq!(
        fs::read_to_string(ppt.join("charts").join("chart1.xml")).unwrap(),
        first
    );
}

#[test]
fn test_report_json() {
    let temp = tempfile::tempdir().unwrap();
    let report = fix_charts_in_dir(temp.path());
    assert_eq!(
        serde_json::to_string(&report).unwrap(),
        r#"{"success":true,"chartsFixed":0,"totalCharts":0}"#
    );
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_matches_sync() {
    let temp = tempfile::tempdir().unwrap();
    unpacked(temp.path());
    let report = pptxhtml::fixer::fix_charts_in_dir_async(temp.path().join("ppt")).await;
    assert!(report.success);
    assert_eq!(report.total_charts, 2);
    assert_eq!(report.charts_fixed, 2);
}
