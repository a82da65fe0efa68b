use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::str::{FromStr, SplitAsciiWhitespace};

use log::info;
use nalgebra::Point3;

use crate::error::{OrreryError, Result};
use crate::math::sphere::SphereResolution;
use crate::model::orrery::{BodyID, BodyInfo, Orrery};

/// The system that ships with the binary: the sun, the planets, and a few of
/// their moons.
pub const DEFAULT_SYSTEM: &str = include_str!("../solar-system.txt");

/// Reads a system description from disk.
///
/// The format is a whitespace-separated table with one body per line:
///
/// ```text
/// name  kind  radius  color  rotation_period  [parent  orbital_radius  orbital_period]
/// ```
///
/// The first line is a header and is skipped. `#` starts a comment. `kind` is
/// one of `star`, `planet` or `moon`; stars take no orbit columns. `color` is
/// a six digit hex RGB value. `parent` is the name of a body listed earlier
/// in the file, or `-` for none.
pub fn read_file(path: impl AsRef<Path>, resolution: SphereResolution) -> Result<Orrery> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let orrery = parse_system(&text, resolution)?;
    info!("Loaded {} bodies from {}", orrery.len(), path.display());
    Ok(orrery)
}

pub fn default_system(resolution: SphereResolution) -> Result<Orrery> {
    let orrery = parse_system(DEFAULT_SYSTEM, resolution)?;
    info!("Loaded built-in system with {} bodies", orrery.len());
    Ok(orrery)
}

pub fn parse_system(text: &str, resolution: SphereResolution) -> Result<Orrery> {
    let mut orrery = Orrery::with_resolution(resolution);
    let mut name_to_id: HashMap<String, BodyID> = HashMap::new();

    let lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, strip_comment(line).trim()))
        .filter(|(_, line)| !line.is_empty())
        // header
        .skip(1);

    for (line_no, line) in lines {
        let mut fields = Fields::new(line, line_no);

        let name = fields.next_str("name")?;
        if name_to_id.contains_key(name) {
            return Err(fields.error(format!("duplicate body name {}", name)));
        }
        let kind = fields.next_str("kind")?;
        let radius: f32 = fields.next_parsed("radius")?;
        let color = parse_color(fields.next_str("color")?)
            .ok_or_else(|| fields.error("color must be six hex digits, e.g. ffe633"))?;
        let rotation_period: f64 = fields.next_parsed("rotation period")?;
        let info = BodyInfo::new(name, radius, Some(color));

        let id = match kind.to_ascii_lowercase().as_str() {
            "star" => {
                fields.finish()?;
                orrery.add_star(info, rotation_period)?
            }
            "planet" | "moon" => {
                let parent = match fields.next_str("parent")? {
                    "-" => None,
                    parent => match name_to_id.get(parent) {
                        Some(&id) => Some(id),
                        None => {
                            return Err(fields.error(format!(
                                "unknown parent {} (parents must be listed before their children)",
                                parent
                            )))
                        }
                    },
                };
                let orbital_radius: f64 = fields.next_parsed("orbital radius")?;
                let orbital_period: f64 = fields.next_parsed("orbital period")?;
                fields.finish()?;

                if kind.eq_ignore_ascii_case("planet") {
                    orrery.add_planet(info, parent, orbital_radius, orbital_period, rotation_period)?
                } else {
                    orrery.add_moon(info, parent, orbital_radius, orbital_period, rotation_period)?
                }
            }
            other => return Err(fields.error(format!("unknown body kind {}", other))),
        };
        name_to_id.insert(name.to_owned(), id);
    }

    Ok(orrery)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

pub fn parse_color(s: &str) -> Option<Point3<f32>> {
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let channel = |range: Range<usize>| u8::from_str_radix(&s[range], 16).ok();
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    Some(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

struct Fields<'a> {
    inner: SplitAsciiWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str, line_no: usize) -> Self {
        Fields {
            inner: line.split_ascii_whitespace(),
            line: line_no,
        }
    }

    fn error(&self, message: impl Into<String>) -> OrreryError {
        OrreryError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str> {
        match self.inner.next() {
            Some(field) => Ok(field),
            None => Err(self.error(format!("missing {}", what))),
        }
    }

    fn next_parsed<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let field = self.next_str(what)?;
        field
            .parse()
            .map_err(|_| self.error(format!("could not parse {} from {:?}", what, field)))
    }

    fn finish(&mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(self.error(format!("unexpected trailing field {:?}", extra))),
        }
    }
}
