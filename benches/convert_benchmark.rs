//! Benchmarks for pptxhtml conversion performance.
//!
//! Run with: cargo bench
//!
//! Slide conversion is measured at several deck sizes; the chart fixer is
//! measured on a single chart part.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const CHART_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><c:date1904 val="0"/><c:chart><c:plotArea><c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:ser><c:idx val="0"/><c:tx><c:v>Sales</c:v></c:tx><c:cat><c:strRef><c:strCache><c:ptCount val="4"/><c:pt idx="0"><c:v>Q1</c:v></c:pt><c:pt idx="1"><c:v>Q2</c:v></c:pt><c:pt idx="2"><c:v>Q3</c:v></c:pt><c:pt idx="3"><c:v>Q4</c:v></c:pt></c:strCache></c:strRef></c:cat><c:val><c:numRef><c:numCache><c:ptCount val="4"/><c:pt idx="0"><c:v>12</c:v></c:pt><c:pt idx="1"><c:v>18</c:v></c:pt><c:pt idx="2"><c:v>9.5</c:v></c:pt><c:pt idx="3"><c:v>22</c:v></c:pt></c:numCache></c:numRef></c:val></c:ser><c:gapWidth val="150"/></c:barChart><c:valAx><c:majorGridlines/><c:majorTickMark val="out"/></c:valAx></c:plotArea><c:legend><c:legendPos val="r"/></c:legend></c:chart></c:chartSpace>"#;

/// Creates a synthetic PPTX deck with the given number of slides.
fn create_test_pptx(slide_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let mut put = |name: &str, body: String| {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };

    put(
        "[Content_Types].xml",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#
            .to_string(),
    );
    put(
        "_rels/.rels",
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
            .to_string(),
    );

    let ids: String = (1..=slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i))
        .collect();
    put(
        "ppt/presentation.xml",
        format!(
            r#"<p:presentation {NS}><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#
        ),
    );

    let rels: String = (1..=slide_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{i}.xml"/>"#
            )
        })
        .collect();
    put(
        "ppt/_rels/presentation.xml.rels",
        format!(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#),
    );

    put("ppt/charts/chart1.xml", CHART_XML.to_string());

    for i in 1..=slide_count {
        put(
            &format!("ppt/slides/slide{i}.xml"),
            format!(
                r#"<p:sld {NS}><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="274638"/><a:ext cx="8229600" cy="1143000"/></a:xfrm><a:prstGeom prst="rect"/></p:spPr><p:txBody><a:p><a:r><a:rPr sz="3200" b="1"/><a:t>Slide {i} heading</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Arrow"/></p:nvSpPr><p:spPr><a:xfrm rot="5400000"><a:off x="914400" y="1828800"/><a:ext cx="1828800" cy="914400"/></a:xfrm><a:prstGeom prst="rightArrow"/><a:solidFill><a:srgbClr val="4472C4"/></a:solidFill></p:spPr></p:sp>
<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="Chart"/></p:nvGraphicFramePr><p:xfrm><a:off x="4572000" y="1828800"/><a:ext cx="5486400" cy="3657600"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rIdChart"/></a:graphicData></a:graphic></p:graphicFrame>
</p:spTree></p:cSld></p:sld>"#
            ),
        );
        put(
            &format!("ppt/slides/_rels/slide{i}.xml.rels"),
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rIdChart" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml"/></Relationships>"#
                .to_string(),
        );
    }

    zip.finish().unwrap();
    buffer
}

/// Benchmark full deck conversion at various sizes.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for slide_count in [1, 10, 50].iter() {
        let data = create_test_pptx(*slide_count);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("slides", slide_count), &data, |b, data| {
            b.iter(|| {
                let _ = pptxhtml::convert_bytes(black_box(data));
            });
        });
    }

    group.finish();
}

/// Benchmark HTML document assembly from an already converted deck.
fn bench_document(c: &mut Criterion) {
    let data = create_test_pptx(10);
    let presentation = pptxhtml::convert_bytes(&data).unwrap();

    c.bench_function("to_html", |b| {
        b.iter(|| {
            let _ = black_box(&presentation).to_html();
        });
    });
}

/// Benchmark the chart XML fixer on a single part.
fn bench_fix_chart(c: &mut Criterion) {
    c.bench_function("fix_chart_xml", |b| {
        b.iter(|| {
            let _ = pptxhtml::fix_chart_xml(black_box(CHART_XML));
        });
    });
}

criterion_group!(benches, bench_convert, bench_document, bench_fix_chart);
criterion_main!(benches);
