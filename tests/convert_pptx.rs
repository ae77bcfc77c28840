//! End-to-end conversion of synthetic PPTX packages.
//!
//! Run with: cargo test --test convert_pptx

use pptxhtml::render::{ImageMode, RenderOptions};
use pptxhtml::{convert_bytes, convert_bytes_with_options, Error, PptxConverter, PresentationFormat};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// 1x1 transparent PNG.
const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn slide1() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS}><p:cSld name="Overview"><p:spTree>
  <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
  <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
    <p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"/><a:t>Quarterly Review</a:t></a:r></a:p></p:txBody></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="3" name="Arrow 2"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="1270000" y="635000"/><a:ext cx="2540000" cy="1270000"/></a:xfrm>
    <a:prstGeom prst="rightArrow"><a:avLst><a:gd name="adj1" fmla="val 50000"/><a:gd name="adj2" fmla="val 50000"/></a:avLst></a:prstGeom>
    <a:solidFill><a:schemeClr val="accent1"/></a:solidFill></p:spPr></p:sp>
  <p:pic><p:nvPicPr><p:cNvPr id="4" name="Picture 3" descr="Logo"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
    <p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>
    <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="635000" cy="635000"/></a:xfrm><a:prstGeom prst="rect"/></p:spPr></p:pic>
  <p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="5" name="Chart 4"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
    <p:xfrm><a:off x="0" y="2540000"/><a:ext cx="5080000" cy="3810000"/></p:xfrm>
    <a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId3"/></a:graphicData></a:graphic></p:graphicFrame>
  <p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="6" name="Table 5"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
    <p:xfrm><a:off x="6350000" y="2540000"/><a:ext cx="2540000" cy="762000"/></p:xfrm>
    <a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl>
      <a:tblGrid><a:gridCol w="1270000"/><a:gridCol w="1270000"/></a:tblGrid>
      <a:tr h="381000"><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>Region</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>
        <a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>Total</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>
    </a:tbl></a:graphicData></a:graphic></p:graphicFrame>
  <p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="7" name="Broken chart"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
    <p:xfrm><a:off x="0" y="0"/><a:ext cx="1270000" cy="1270000"/></p:xfrm>
    <a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId4"/></a:graphicData></a:graphic></p:graphicFrame>
</p:spTree></p:cSld></p:sld>"#
    )
}

fn slide2() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS} show="0"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="102030"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>
  <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
  <p:sp><p:nvSpPr><p:cNvPr id="2" name="Note"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1270000" cy="1270000"/></a:xfrm><a:prstGeom prst="rect"/></p:spPr>
    <p:txBody><a:bodyPr/><a:p><a:r><a:t>Thanks</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn layout() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NS}><p:cSld name="Title Only"><p:spTree>
  <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
  <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="635000" y="127000"/><a:ext cx="7620000" cy="508000"/></a:xfrm></p:spPr></p:sp>
</p:spTree></p:cSld></p:sldLayout>"#
    )
}

fn master() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {NS}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>
  <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
  <p:sp><p:nvSpPr><p:cNvPr id="9" name="Footer band"/><p:cNvSpPr/><p:nvPr userDrawn="1"/></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="0" y="6604000"/><a:ext cx="9144000" cy="254000"/></a:xfrm><a:prstGeom prst="rect"/>
    <a:solidFill><a:schemeClr val="tx2"/></a:solidFill></p:spPr></p:sp>
</p:spTree></p:cSld>
<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
</p:sldMaster>"#
    )
}

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Test"><a:themeElements>
<a:clrScheme name="Test"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
<a:dk2><a:srgbClr val="1F2D3D"/></a:dk2><a:lt2><a:srgbClr val="EEEEEE"/></a:lt2>
<a:accent1><a:srgbClr val="C00000"/></a:accent1><a:accent2><a:srgbClr val="00B050"/></a:accent2>
<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4>
<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6>
<a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme>
</a:themeElements></a:theme>"#;

const CHART: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
<c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>
<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:varyColors val="0"/>
<c:ser><c:idx val="0"/><c:order val="0"/><c:tx><c:strRef><c:strCache><c:ptCount val="1"/><c:pt idx="0"><c:v>Revenue</c:v></c:pt></c:strCache></c:strRef></c:tx>
<c:cat><c:strRef><c:strCache><c:ptCount val="3"/><c:pt idx="0"><c:v>North</c:v></c:pt><c:pt idx="1"><c:v>South</c:v></c:pt><c:pt idx="2"><c:v>West</c:v></c:pt></c:strCache></c:strRef></c:cat>
<c:val><c:numRef><c:numCache><c:ptCount val="3"/><c:pt idx="0"><c:v>12</c:v></c:pt><c:pt idx="1"><c:v>7.5</c:v></c:pt><c:pt idx="2"><c:v>3</c:v></c:pt></c:numCache></c:numRef></c:val>
</c:ser><c:gapWidth val="150"/><c:axId val="1"/><c:axId val="2"/></c:barChart>
<c:catAx><c:axId val="1"/><c:delete val="0"/><c:crossAx val="2"/></c:catAx>
<c:valAx><c:axId val="2"/><c:delete val="0"/><c:majorGridlines/><c:crossAx val="1"/></c:valAx>
</c:plotArea><c:plotVisOnly val="1"/></c:chart></c:chartSpace>"#;

const BROKEN_CHART: &str = r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart><c:plotArea><c:radarChart/></c:plotArea></c:chart></c:chartSpace>"#;

fn build_pptx() -> Vec<u8> {
    let presentation = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/><p:sldId id="258" r:id="rId9"/></p:sldIdLst>
<p:sldSz cx="9144000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    );
    let parts: Vec<(&str, Vec<u8>)> = vec![
        (
            "[Content_Types].xml",
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#
                .to_vec(),
        ),
        ("_rels/.rels", rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]).into_bytes()),
        (
            "docProps/core.xml",
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Quarterly Review</dc:title><dc:creator>Finance</dc:creator></cp:coreProperties>"#
                .to_vec(),
        ),
        ("ppt/presentation.xml", presentation.into_bytes()),
        (
            "ppt/_rels/presentation.xml.rels",
            rels(&[
                ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                ("rId2", "slide", "slides/slide1.xml"),
                ("rId3", "slide", "slides/slide2.xml"),
                ("rId9", "slide", "slides/missing.xml"),
            ])
            .into_bytes(),
        ),
        ("ppt/slides/slide1.xml", slide1().into_bytes()),
        (
            "ppt/slides/_rels/slide1.xml.rels",
            rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "image", "../media/image1.png"),
                ("rId3", "chart", "../charts/chart1.xml"),
                ("rId4", "chart", "../charts/chart2.xml"),
            ])
            .into_bytes(),
        ),
        ("ppt/slides/slide2.xml", slide2().into_bytes()),
        (
            "ppt/slides/_rels/slide2.xml.rels",
            rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]).into_bytes(),
        ),
        ("ppt/slideLayouts/slideLayout1.xml", layout().into_bytes()),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).into_bytes(),
        ),
        ("ppt/slideMasters/slideMaster1.xml", master().into_bytes()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&[("rId1", "theme", "../theme/theme1.xml")]).into_bytes(),
        ),
        ("ppt/theme/theme1.xml", THEME.as_bytes().to_vec()),
        ("ppt/charts/chart1.xml", CHART.as_bytes().to_vec()),
        ("ppt/charts/chart2.xml", BROKEN_CHART.as_bytes().to_vec()),
        ("ppt/media/image1.png", PNG.to_vec()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(&data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_detects_presentation() {
    let data = build_pptx();
    assert_eq!(
        pptxhtml::detect_format_from_bytes(&data).unwrap(),
        PresentationFormat::Presentation
    );
}

#[test]
fn test_slide_order_size_and_properties() {
    let converter = PptxConverter::from_bytes(build_pptx()).unwrap();
    // The third reference has no part and is dropped.
    assert_eq!(converter.slide_count(), 2);
    assert_eq!(converter.slide_size(), (720.0, 540.0));
    assert_eq!(converter.media_parts(), vec!["ppt/media/image1.png".to_string()]);

    let presentation = converter.convert().unwrap();
    assert_eq!(presentation.properties.title.as_deref(), Some("Quarterly Review"));
    assert_eq!(presentation.properties.creator.as_deref(), Some("Finance"));
    assert_eq!(presentation.slides[0].index, 1);
    assert_eq!(presentation.slides[0].name.as_deref(), Some("Overview"));
    assert_eq!(presentation.slides[1].part, "ppt/slides/slide2.xml");
    assert!(presentation.slides[1].hidden);
}

#[test]
fn test_first_slide_elements() {
    let presentation = convert_bytes(&build_pptx()).unwrap();
    let html = &presentation.slides[0].html;

    assert!(html.starts_with("<section class=\"pptx-slide\" data-slide=\"1\""));
    assert!(html.contains("width: 720px; height: 540px;"));

    // Master decoration with the theme's dk2 through the color map.
    assert!(html.contains("data-name=\"Footer band\""));
    assert!(html.contains("background: #1F2D3D;"));

    // Title placeholder takes the layout geometry.
    assert!(html.contains("left: 50px; top: 10px; width: 600px; height: 40px;"));
    assert!(html.contains("Quarterly Review"));

    // Arrow filled with the theme's accent1.
    assert!(html.contains("data-preset=\"rightArrow\""));
    assert!(html.contains("background: #C00000;"));
    assert!(html.contains("clip-path: polygon(0% 25%, 50% 25%, 50% 0%, 100% 50%, 50% 100%, 50% 75%, 0% 75%);"));

    // Picture embedded as a data URI.
    assert!(html.contains("class=\"pptx-picture\""));
    assert!(html.contains("src=\"data:image/png;base64,iVBORw0KGgo"));

    // Chart, table, and the isolated failure of an unsupported chart.
    assert!(html.contains("pptx-chart-bar"));
    assert!(html.matches("<rect ").count() >= 3);
    assert!(html.contains(">North</text>"));
    assert!(html.contains("class=\"pptx-table\""));
    assert!(html.contains(">Region<"));
    assert!(html.contains("pptx-render-error"));
    assert!(html.contains("chart type radarChart"));
}

#[test]
fn test_background_and_text() {
    let presentation = convert_bytes(&build_pptx()).unwrap();
    assert!(presentation.slides[0].html.contains("background: #FFFFFF;\">"));
    assert!(presentation.slides[1].html.contains("background: #102030;\">"));
    assert_eq!(presentation.slides[1].text, "Thanks");
    assert!(presentation.plain_text().contains("Quarterly Review"));
    assert!(presentation.plain_text().contains("Region\tTotal"));
}

#[test]
fn test_document_and_fragment_output() {
    let data = build_pptx();
    let document = convert_bytes(&data).unwrap().to_html();
    assert!(document.starts_with("<!DOCTYPE html>"));
    assert!(document.contains("<title>Quarterly Review</title>"));
    assert_eq!(document.matches("<section class=\"pptx-slide\"").count(), 2);

    let options = RenderOptions::default()
        .with_standalone(false)
        .with_image_mode(ImageMode::Link)
        .with_image_prefix("assets/");
    let fragments = convert_bytes_with_options(&data, &options).unwrap().to_html();
    assert!(!fragments.contains("<!DOCTYPE html>"));
    assert!(fragments.contains("src=\"assets/image1.png\""));
}

#[test]
fn test_single_slide_and_bad_index() {
    let converter = PptxConverter::from_bytes(build_pptx()).unwrap();
    let slide = converter.convert_slide(2).unwrap();
    assert!(slide.html.contains("data-slide=\"2\""));
    assert!(matches!(converter.convert_slide(0), Err(Error::InvalidData(_))));
    assert!(matches!(converter.convert_slide(3), Err(Error::InvalidData(_))));
}

#[test]
fn test_package_without_presentation_part() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("_rels/.rels", SimpleFileOptions::default()).unwrap();
    zip.write_all(rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]).as_bytes())
        .unwrap();
    let data = zip.finish().unwrap().into_inner();
    assert!(matches!(
        PptxConverter::from_bytes(data),
        Err(Error::MissingComponent(_))
    ));
}
