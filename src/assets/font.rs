//! Typeface fonts
//!
//! Reads the JSON typeface format (glyph outlines as `m`/`l`/`q`/`b` command
//! strings in font units) and lays text out as flattened 2D outline paths.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::SplitWhitespace,
};

use cgmath::Vector2;
use serde::Deserialize;

use crate::error::{Result, SceneError};

/// Glyph used in place of characters the font does not define
pub const FALLBACK_GLYPH: char = '?';

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceFile {
    glyphs: HashMap<String, GlyphRecord>,
    resolution: f32,
    bounding_box: BoundsRecord,
    #[serde(default)]
    underline_thickness: f32,
    #[serde(default)]
    family_name: String,
}

#[derive(Debug, Deserialize)]
struct GlyphRecord {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundsRecord {
    y_min: f32,
    y_max: f32,
}

/// One drawing command of a glyph outline, in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(Vector2<f32>),
    LineTo(Vector2<f32>),
    QuadTo {
        ctrl: Vector2<f32>,
        to: Vector2<f32>,
    },
    CubicTo {
        ctrl1: Vector2<f32>,
        ctrl2: Vector2<f32>,
        to: Vector2<f32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal advance in font units
    pub advance: f32,
    pub commands: Vec<OutlineCommand>,
}

impl Glyph {
    fn parse(glyph: char, record: &GlyphRecord) -> Result<Self> {
        let commands = match &record.o {
            Some(outline) => parse_outline(glyph, outline)?,
            None => Vec::new(),
        };
        Ok(Self {
            advance: record.ha,
            commands,
        })
    }

    /// Flattens the outline into closed polylines
    ///
    /// Every `MoveTo` starts a new path. Curves are split into `curve_segments`
    /// straight pieces. Points are transformed by `scale` then `offset`.
    pub fn paths(&self, scale: f32, offset: Vector2<f32>, curve_segments: u32) -> Vec<Vec<Vector2<f32>>> {
        let segments = curve_segments.max(1);
        let map = |p: Vector2<f32>| p * scale + offset;

        let mut paths = Vec::new();
        let mut current: Vec<Vector2<f32>> = Vec::new();

        for command in &self.commands {
            match *command {
                OutlineCommand::MoveTo(p) => {
                    if !current.is_empty() {
                        paths.push(std::mem::take(&mut current));
                    }
                    current.push(map(p));
                }
                OutlineCommand::LineTo(p) => current.push(map(p)),
                OutlineCommand::QuadTo { ctrl, to } => {
                    let start = current.last().copied().unwrap_or(map(ctrl));
                    let (c, end) = (map(ctrl), map(to));
                    for k in 1..=segments {
                        let t = k as f32 / segments as f32;
                        let u = 1.0 - t;
                        current.push(start * (u * u) + c * (2.0 * u * t) + end * (t * t));
                    }
                }
                OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                    let start = current.last().copied().unwrap_or(map(ctrl1));
                    let (c1, c2, end) = (map(ctrl1), map(ctrl2), map(to));
                    for k in 1..=segments {
                        let t = k as f32 / segments as f32;
                        let u = 1.0 - t;
                        current.push(
                            start * (u * u * u)
                                + c1 * (3.0 * u * u * t)
                                + c2 * (3.0 * u * t * t)
                                + end * (t * t * t),
                        );
                    }
                }
            }
        }
        if !current.is_empty() {
            paths.push(current);
        }

        paths
            .into_iter()
            .map(dedup_ring)
            .filter(|path| path.len() >= 3)
            .collect()
    }
}

/// Drops consecutive duplicates and a closing point equal to the first
fn dedup_ring(mut path: Vec<Vector2<f32>>) -> Vec<Vector2<f32>> {
    const EPS: f32 = 1e-7;
    path.dedup_by(|a, b| (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS);
    while path.len() > 1 {
        let (first, last) = (path[0], path[path.len() - 1]);
        if (first.x - last.x).abs() < EPS && (first.y - last.y).abs() < EPS {
            path.pop();
        } else {
            break;
        }
    }
    path
}

fn next_point(tokens: &mut SplitWhitespace<'_>, glyph: char, action: &str) -> Result<Vector2<f32>> {
    let mut coord = || -> Result<f32> {
        let token = tokens.next().ok_or_else(|| SceneError::Outline {
            glyph,
            reason: format!("'{action}' is missing a coordinate"),
        })?;
        token.parse::<f32>().map_err(|_| SceneError::Outline {
            glyph,
            reason: format!("'{token}' is not a number"),
        })
    };
    let x = coord()?;
    let y = coord()?;
    Ok(Vector2::new(x, y))
}

fn parse_outline(glyph: char, outline: &str) -> Result<Vec<OutlineCommand>> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    while let Some(action) = tokens.next() {
        let command = match action {
            "m" => OutlineCommand::MoveTo(next_point(&mut tokens, glyph, action)?),
            "l" => OutlineCommand::LineTo(next_point(&mut tokens, glyph, action)?),
            // End point comes first, then the control point(s)
            "q" => {
                let to = next_point(&mut tokens, glyph, action)?;
                let ctrl = next_point(&mut tokens, glyph, action)?;
                OutlineCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = next_point(&mut tokens, glyph, action)?;
                let ctrl1 = next_point(&mut tokens, glyph, action)?;
                let ctrl2 = next_point(&mut tokens, glyph, action)?;
                OutlineCommand::CubicTo { ctrl1, ctrl2, to }
            }
            "z" => continue,
            other => {
                return Err(SceneError::Outline {
                    glyph,
                    reason: format!("unknown command '{other}'"),
                })
            }
        };
        commands.push(command);
    }

    Ok(commands)
}

/// A parsed typeface
#[derive(Debug, Clone)]
pub struct Font {
    pub family_name: String,
    /// Font units per em
    pub resolution: f32,
    /// Distance between baselines, in font units
    pub line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Parses typeface JSON; `origin` only labels errors
    pub fn parse(json: &str, origin: &Path) -> Result<Self> {
        let file: TypefaceFile =
            serde_json::from_str(json).map_err(|source| SceneError::FontParse {
                path: origin.to_path_buf(),
                source,
            })?;

        let mut glyphs = HashMap::with_capacity(file.glyphs.len());
        for (key, record) in &file.glyphs {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                log::debug!("Skipping multi-character glyph key {key:?}");
                continue;
            };
            glyphs.insert(c, Glyph::parse(c, record)?);
        }

        Ok(Self {
            family_name: file.family_name,
            resolution: file.resolution,
            line_height: file.bounding_box.y_max - file.bounding_box.y_min
                + file.underline_thickness,
            glyphs,
        })
    }

    /// Parses typeface JSON that did not come from a file
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, &PathBuf::from("<inline>"))
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyph for `c`, falling back to `?`
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs
            .get(&c)
            .or_else(|| self.glyphs.get(&FALLBACK_GLYPH))
    }

    /// Lays `text` out at `size` units per em and returns one polyline per outline
    ///
    /// Newlines move to the next line; characters without a glyph (and no
    /// fallback) are skipped.
    pub fn text_paths(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Vec<Vector2<f32>>> {
        let scale = if self.resolution > 0.0 {
            size / self.resolution
        } else {
            0.0
        };
        let line_height = self.line_height * scale;

        let mut paths = Vec::new();
        let mut offset = Vector2::new(0.0, 0.0);

        for c in text.chars() {
            if c == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }
            match self.glyph(c) {
                Some(glyph) => {
                    paths.extend(glyph.paths(scale, offset, curve_segments));
                    offset.x += glyph.advance * scale;
                }
                None => log::warn!(
                    "Character '{c}' does not exist in font family {}",
                    self.family_name
                ),
            }
        }

        paths
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Square glyph with a square hole, plus a space and a curved glyph
    pub(crate) const BOX_FONT: &str = include_str!("fixtures/box.typeface.json");

    #[test]
    fn test_parse_box_font() {
        let font = Font::from_json(BOX_FONT).unwrap();
        assert_eq!(font.family_name, "Box");
        assert_eq!(font.resolution, 1000.0);
        assert_eq!(font.line_height, 1000.0 + 200.0 + 50.0);
        assert_eq!(font.glyph_count(), 3);

        let glyph = font.glyph('?').unwrap();
        assert_eq!(glyph.advance, 800.0);
        assert_eq!(glyph.commands[0], OutlineCommand::MoveTo(Vector2::new(100.0, 0.0)));
        assert_eq!(glyph.commands.len(), 8);
    }

    #[test]
    fn test_missing_characters_fall_back() {
        let font = Font::from_json(BOX_FONT).unwrap();
        assert_eq!(font.glyph('W'), font.glyph('?'));
        assert!(font.glyph(' ').unwrap().commands.is_empty());
    }

    #[test]
    fn test_quadratic_order_is_end_then_control() {
        let commands = parse_outline('o', "m 0 0 q 10 0 5 5").unwrap();
        assert_eq!(
            commands[1],
            OutlineCommand::QuadTo {
                ctrl: Vector2::new(5.0, 5.0),
                to: Vector2::new(10.0, 0.0),
            }
        );
    }

    #[test]
    fn test_malformed_outline() {
        assert!(matches!(
            parse_outline('x', "m 0"),
            Err(SceneError::Outline { glyph: 'x', .. })
        ));
        assert!(matches!(
            parse_outline('x', "m 0 0 k 1 1"),
            Err(SceneError::Outline { .. })
        ));
        assert!(matches!(
            parse_outline('x', "l a b"),
            Err(SceneError::Outline { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = Font::parse("{ not json", Path::new("fonts/bad.json")).unwrap_err();
        match err {
            SceneError::FontParse { path, .. } => assert_eq!(path, Path::new("fonts/bad.json")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_text_layout_advances_and_wraps() {
        let font = Font::from_json(BOX_FONT).unwrap();

        // Two boxes: each contributes an outer ring and a hole
        let paths = font.text_paths("??", 1.0, 4);
        assert_eq!(paths.len(), 4);
        let second_outer = &paths[2];
        assert!((second_outer[0].x - (0.8 + 0.1)).abs() < 1e-6);

        let wrapped = font.text_paths("?\n?", 1.0, 4);
        assert!((wrapped[2][0].y - (-1.25)).abs() < 1e-6);
        assert!((wrapped[2][0].x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_curves_are_flattened() {
        let font = Font::from_json(BOX_FONT).unwrap();
        let glyph = font.glyph('o').unwrap();
        let paths = glyph.paths(1.0, Vector2::new(0.0, 0.0), 5);

        assert_eq!(paths.len(), 1);
        // Four quadratic quarter arcs of five segments each; the last point
        // closes onto the first and is dropped.
        assert_eq!(paths[0].len(), 20);
    }
}
