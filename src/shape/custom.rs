//! Custom geometry (`a:custGeom`): guide formulas and path emission.

use crate::error::{Error, Result};
use crate::units::{angle_to_rad, fmt_num, ANGLE_UNIT, EMU_PER_PX};
use crate::xml::XmlNode;
use std::collections::HashMap;

/// Named guide values for one shape, in shape coordinates (EMU).
#[derive(Debug, Clone, Default)]
pub struct GuideEnv {
    values: HashMap<String, f64>,
}

impl GuideEnv {
    /// Environment with the builtin guides for a `w`×`h` shape.
    pub fn new(w: f64, h: f64) -> Self {
        let ss = w.min(h);
        let ls = w.max(h);
        let mut values = HashMap::new();
        let builtins: &[(&str, f64)] = &[
            ("w", w),
            ("h", h),
            ("l", 0.0),
            ("t", 0.0),
            ("r", w),
            ("b", h),
            ("hc", w / 2.0),
            ("vc", h / 2.0),
            ("wd2", w / 2.0),
            ("wd3", w / 3.0),
            ("wd4", w / 4.0),
            ("wd5", w / 5.0),
            ("wd6", w / 6.0),
            ("wd8", w / 8.0),
            ("wd10", w / 10.0),
            ("wd32", w / 32.0),
            ("hd2", h / 2.0),
            ("hd3", h / 3.0),
            ("hd4", h / 4.0),
            ("hd5", h / 5.0),
            ("hd6", h / 6.0),
            ("hd8", h / 8.0),
            ("hd10", h / 10.0),
            ("ss", ss),
            ("ls", ls),
            ("ssd2", ss / 2.0),
            ("ssd4", ss / 4.0),
            ("ssd6", ss / 6.0),
            ("ssd8", ss / 8.0),
            ("ssd16", ss / 16.0),
            ("ssd32", ss / 32.0),
            ("cd2", 180.0 * ANGLE_UNIT),
            ("cd4", 90.0 * ANGLE_UNIT),
            ("cd8", 45.0 * ANGLE_UNIT),
            ("3cd4", 270.0 * ANGLE_UNIT),
            ("3cd8", 135.0 * ANGLE_UNIT),
            ("5cd8", 225.0 * ANGLE_UNIT),
            ("7cd8", 315.0 * ANGLE_UNIT),
            ("hd32", h / 32.0),
        ];
        for (name, value) in builtins {
            values.insert(name.to_string(), *value);
        }
        Self { values }
    }

    /// Value of a guide; unknown names are 0.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Define (or redefine) a guide.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Resolve an argument: a number literal or a guide name.
    pub fn resolve(&self, token: &str) -> f64 {
        token.parse::<f64>().unwrap_or_else(|_| self.get(token))
    }

    /// Evaluate every `a:gd` of a guide list in order.
    pub fn define_all(&mut self, gd_lst: Option<&XmlNode>) {
        for gd in gd_lst.into_iter().flat_map(|l| l.children_named("a:gd")) {
            let (Some(name), Some(fmla)) = (gd.attr("name"), gd.attr("fmla")) else {
                continue;
            };
            let value = self.eval(fmla);
            self.set(name, value);
        }
    }

    /// Evaluate a guide formula such as `*/ w adj 100000`.
    ///
    /// Angles are in 60000ths of a degree; division by zero yields 0.
    pub fn eval(&self, fmla: &str) -> f64 {
        let mut parts = fmla.split_whitespace();
        let Some(op) = parts.next() else {
            return 0.0;
        };
        let args: Vec<f64> = parts.map(|t| self.resolve(t)).collect();
        let arg = |i: usize| args.get(i).copied().unwrap_or(0.0);
        let (x, y, z) = (arg(0), arg(1), arg(2));
        let div = |n: f64, d: f64| if d == 0.0 { 0.0 } else { n / d };
        let value = match op {
            "val" => x,
            "*/" => div(x * y, z),
            "+-" => x + y - z,
            "+/" => div(x + y, z),
            "?:" => {
                if x > 0.0 {
                    y
                } else {
                    z
                }
            }
            "*" => x * y,
            "/" => div(x, y),
            "+" => x + y,
            "-" => x - y,
            "abs" => x.abs(),
            "max" => x.max(y),
            "min" => x.min(y),
            "sqrt" => x.max(0.0).sqrt(),
            "sin" => x * angle_to_rad(y).sin(),
            "cos" => x * angle_to_rad(y).cos(),
            "tan" => x * angle_to_rad(y).tan(),
            "at2" => y.atan2(x).to_degrees() * ANGLE_UNIT,
            "cat2" => x * z.atan2(y).cos(),
            "sat2" => x * z.atan2(y).sin(),
            "mod" => (x * x + y * y + z * z).sqrt(),
            "pin" => {
                if y < x {
                    x
                } else if y > z {
                    z
                } else {
                    y
                }
            }
            _ => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// One emitted sub-path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    /// SVG path data in target pixels
    pub d: String,
    /// `a:path/@fill` is not `none`
    pub filled: bool,
    /// `a:path/@stroke` is not `0`/`false`
    pub stroked: bool,
}

/// Full-bounds rectangle path.
pub fn rect_path(width: f64, height: f64) -> String {
    let (w, h) = (fmt_num(width, 2), fmt_num(height, 2));
    format!("M0,0 L{w},0 L{w},{h} L0,{h} Z")
}

struct PathWriter<'a> {
    env: &'a GuideEnv,
    sx: f64,
    sy: f64,
    pen: (f64, f64),
    out: Vec<String>,
}

impl PathWriter<'_> {
    fn point(&self, pt: &XmlNode) -> Result<(f64, f64)> {
        let x = pt
            .attr("x")
            .ok_or_else(|| Error::InvalidData("path point without x".into()))?;
        let y = pt
            .attr("y")
            .ok_or_else(|| Error::InvalidData("path point without y".into()))?;
        Ok((self.env.resolve(x), self.env.resolve(y)))
    }

    fn points(&self, cmd: &XmlNode, expected: usize) -> Result<Vec<(f64, f64)>> {
        let pts = cmd
            .children_named("a:pt")
            .map(|pt| self.point(pt))
            .collect::<Result<Vec<_>>>()?;
        if pts.len() < expected {
            return Err(Error::InvalidData(format!(
                "{} needs {} points, found {}",
                cmd.local_name(),
                expected,
                pts.len()
            )));
        }
        Ok(pts)
    }

    fn fmt(&self, (x, y): (f64, f64)) -> String {
        format!("{},{}", fmt_num(x * self.sx, 2), fmt_num(y * self.sy, 2))
    }

    fn command(&mut self, cmd: &XmlNode) -> Result<()> {
        match cmd.local_name() {
            "moveTo" => {
                let p = self.points(cmd, 1)?[0];
                self.out.push(format!("M{}", self.fmt(p)));
                self.pen = p;
            }
            "lnTo" => {
                let p = self.points(cmd, 1)?[0];
                self.out.push(format!("L{}", self.fmt(p)));
                self.pen = p;
            }
            "cubicBezTo" => {
                let pts = self.points(cmd, 3)?;
                self.out.push(format!(
                    "C{} {} {}",
                    self.fmt(pts[0]),
                    self.fmt(pts[1]),
                    self.fmt(pts[2])
                ));
                self.pen = pts[2];
            }
            "quadBezTo" => {
                let pts = self.points(cmd, 2)?;
                self.out
                    .push(format!("Q{} {}", self.fmt(pts[0]), self.fmt(pts[1])));
                self.pen = pts[1];
            }
            "arcTo" => self.arc(cmd)?,
            "close" => self.out.push("Z".to_string()),
            other => {
                tracing::debug!(command = other, "ignoring unknown path command");
            }
        }
        Ok(())
    }

    fn arc(&mut self, cmd: &XmlNode) -> Result<()> {
        let attr = |name: &str| {
            cmd.attr(name)
                .map(|v| self.env.resolve(v))
                .ok_or_else(|| Error::InvalidData(format!("arcTo without {}", name)))
        };
        let (wr, hr) = (attr("wR")?, attr("hR")?);
        let (st, sw) = (attr("stAng")?, attr("swAng")?);

        let start = angle_to_rad(st);
        let center = (self.pen.0 - wr * start.cos(), self.pen.1 - hr * start.sin());
        let sweep_deg = sw / ANGLE_UNIT;
        // SVG cannot draw a closed ellipse in one arc segment.
        let segments = if sweep_deg.abs() >= 360.0 { 2 } else { 1 };
        let step = angle_to_rad(sw) / segments as f64;
        for i in 1..=segments {
            let a = start + step * i as f64;
            let end = (center.0 + wr * a.cos(), center.1 + hr * a.sin());
            let large = if (sweep_deg / segments as f64).abs() > 180.0 { 1 } else { 0 };
            let sweep = if sw > 0.0 { 1 } else { 0 };
            self.out.push(format!(
                "A{},{} 0 {} {} {}",
                fmt_num(wr * self.sx, 2),
                fmt_num(hr * self.sy, 2),
                large,
                sweep,
                self.fmt(end)
            ));
            self.pen = end;
        }
        Ok(())
    }
}

fn build_paths(cust_geom: &XmlNode, width: f64, height: f64) -> Result<Vec<PathSpec>> {
    let path_lst = cust_geom
        .child("a:pathLst")
        .ok_or_else(|| Error::MissingComponent("a:pathLst".into()))?;

    let shape_w = width * EMU_PER_PX;
    let shape_h = height * EMU_PER_PX;
    let mut env = GuideEnv::new(shape_w, shape_h);
    env.define_all(cust_geom.child("a:avLst"));
    env.define_all(cust_geom.child("a:gdLst"));

    let mut specs = Vec::new();
    for path in path_lst.children_named("a:path") {
        let native_w = path.attr_f64("w").filter(|v| *v > 0.0).unwrap_or(shape_w);
        let native_h = path.attr_f64("h").filter(|v| *v > 0.0).unwrap_or(shape_h);
        let mut writer = PathWriter {
            env: &env,
            sx: width / native_w,
            sy: height / native_h,
            pen: (0.0, 0.0),
            out: Vec::new(),
        };
        for cmd in &path.children {
            writer.command(cmd)?;
        }
        if writer.out.is_empty() {
            continue;
        }
        specs.push(PathSpec {
            d: writer.out.join(" "),
            filled: path.attr("fill") != Some("none"),
            stroked: !matches!(path.attr("stroke"), Some("0") | Some("false")),
        });
    }
    if specs.is_empty() {
        return Err(Error::MissingComponent("custom geometry has no path commands".into()));
    }
    Ok(specs)
}

/// Sub-paths of a custom geometry scaled to `width`×`height` px.
///
/// Any failure yields a single full-bounds rectangle.
pub fn custom_paths(cust_geom: &XmlNode, width: f64, height: f64) -> Vec<PathSpec> {
    match build_paths(cust_geom, width, height) {
        Ok(specs) => specs,
        Err(e) => {
            tracing::debug!(error = %e, "custom geometry fallback to rectangle");
            vec![PathSpec {
                d: rect_path(width, height),
                filled: true,
                stroked: true,
            }]
        }
    }
}

/// SVG `d` string for a custom geometry, all sub-paths joined.
pub fn custom_path(cust_geom: &XmlNode, width: f64, height: f64) -> String {
    custom_paths(cust_geom, width, height)
        .into_iter()
        .map(|p| p.d)
        .collect::<Vec<_>>()
        .join(" ")
}
