// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Well-Known Text codec.
//!
//! Parses the seven OGC simple-feature kinds into GeoJSON geometry values
//! and writes them back with every ordinate fixed to six decimals, so text
//! produced here is stable across parse/stringify cycles.

use geojson::{Feature, Geometry, PointType, PolygonType, Position, Value};

/// Decimal places written for every ordinate.
pub const COORDINATE_PRECISION: usize = 6;

/// Deepest `GEOMETRYCOLLECTION` nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Errors from WKT parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WktError {
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("Unexpected {found:?} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("Unknown geometry type: {0}")]
    UnknownGeometry(String),

    #[error("Invalid number {0:?}")]
    InvalidNumber(String),

    #[error("Unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("Empty geometries are not supported")]
    Empty,

    #[error("Polygon ring must be closed and have at least 4 positions")]
    InvalidRing,

    #[error("Trailing input at offset {0}")]
    TrailingInput(usize),

    #[error("Geometry collections nested deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Number(n) => n.to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, WktError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((Token::LParen, offset));
            }
            ')' => {
                chars.next();
                tokens.push((Token::RParen, offset));
            }
            ',' => {
                chars.next();
                tokens.push((Token::Comma, offset));
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !c.is_ascii_alphabetic() {
                        break;
                    }
                    word.push(c.to_ascii_uppercase());
                    chars.next();
                }
                tokens.push((Token::Word(word), offset));
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                let mut literal = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')) {
                        break;
                    }
                    literal.push(c);
                    chars.next();
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| WktError::InvalidNumber(literal.clone()))?;
                if !value.is_finite() {
                    return Err(WktError::InvalidNumber(literal));
                }
                tokens.push((Token::Number(value), offset));
            }
            other => return Err(WktError::UnexpectedChar(other, offset)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self, expected: &'static str) -> Result<(Token, usize), WktError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(WktError::UnexpectedEnd(expected))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, wanted: Token, expected: &'static str) -> Result<(), WktError> {
        let (token, offset) = self.next(expected)?;
        if token == wanted {
            Ok(())
        } else {
            Err(WktError::UnexpectedToken {
                found: token.describe(),
                offset,
                expected,
            })
        }
    }

    /// Consume a `,` and return true, or return false at a `)`.
    fn list_continues(&mut self) -> Result<bool, WktError> {
        let (token, offset) = self.next("',' or ')'")?;
        match token {
            Token::Comma => Ok(true),
            Token::RParen => Ok(false),
            other => Err(WktError::UnexpectedToken {
                found: other.describe(),
                offset,
                expected: "',' or ')'",
            }),
        }
    }

    fn number(&mut self) -> Result<f64, WktError> {
        let (token, offset) = self.next("number")?;
        match token {
            Token::Number(n) => Ok(n),
            other => Err(WktError::UnexpectedToken {
                found: other.describe(),
                offset,
                expected: "number",
            }),
        }
    }

    fn position(&mut self) -> Result<Position, WktError> {
        let mut position = vec![self.number()?, self.number()?];
        if let Some(Token::Number(z)) = self.peek() {
            position.push(*z);
            self.pos += 1;
        }
        Ok(position)
    }

    fn positions(&mut self) -> Result<Vec<Position>, WktError> {
        self.list(Self::position)
    }

    fn ring(&mut self) -> Result<Vec<Position>, WktError> {
        let ring = self.positions()?;
        if ring.len() < 4 || ring.first() != ring.last() {
            return Err(WktError::InvalidRing);
        }
        Ok(ring)
    }

    fn polygon(&mut self) -> Result<PolygonType, WktError> {
        self.list(Self::ring)
    }

    /// Multipoint members may or may not be wrapped in their own parens.
    fn multipoint_member(&mut self) -> Result<PointType, WktError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let point = self.position()?;
            self.expect(Token::RParen, "')'")?;
            Ok(point)
        } else {
            self.position()
        }
    }

    fn list<T>(
        &mut self,
        mut member: impl FnMut(&mut Self) -> Result<T, WktError>,
    ) -> Result<Vec<T>, WktError> {
        self.expect(Token::LParen, "'('")?;
        let mut items = vec![member(self)?];
        while self.list_continues()? {
            items.push(member(self)?);
        }
        Ok(items)
    }

    fn geometry(&mut self) -> Result<Value, WktError> {
        let (token, offset) = self.next("geometry type")?;
        let kind = match token {
            Token::Word(word) => word,
            other => {
                return Err(WktError::UnexpectedToken {
                    found: other.describe(),
                    offset,
                    expected: "geometry type",
                })
            }
        };

        match self.peek() {
            Some(Token::Word(tag)) if tag == "Z" => self.pos += 1,
            Some(Token::Word(tag)) if tag == "EMPTY" => return Err(WktError::Empty),
            _ => {}
        }

        match kind.as_str() {
            "POINT" => {
                self.expect(Token::LParen, "'('")?;
                let point = self.position()?;
                self.expect(Token::RParen, "')'")?;
                Ok(Value::Point(point))
            }
            "LINESTRING" => Ok(Value::LineString(self.positions()?)),
            "POLYGON" => Ok(Value::Polygon(self.polygon()?)),
            "MULTIPOINT" => Ok(Value::MultiPoint(self.list(Self::multipoint_member)?)),
            "MULTILINESTRING" => Ok(Value::MultiLineString(self.list(Self::positions)?)),
            "MULTIPOLYGON" => Ok(Value::MultiPolygon(self.list(Self::polygon)?)),
            "GEOMETRYCOLLECTION" => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(WktError::TooDeep(MAX_NESTING_DEPTH));
                }
                self.depth += 1;
                let members = self.list(|p| p.geometry().map(Geometry::new));
                self.depth -= 1;
                Ok(Value::GeometryCollection(members?))
            }
            _ => Err(WktError::UnknownGeometry(kind)),
        }
    }
}

/// Strip an EWKT `SRID=<n>;` prefix.
fn strip_srid(text: &str) -> &str {
    let trimmed = text.trim_start();
    let has_prefix = trimmed
        .get(..5)
        .is_some_and(|p| p.eq_ignore_ascii_case("SRID="));
    match trimmed.split_once(';') {
        Some((_, rest)) if has_prefix => rest,
        _ => text,
    }
}

/// Parse WKT text into a geometry value.
pub fn parse(text: &str) -> Result<Value, WktError> {
    let tokens = tokenize(strip_srid(text))?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.geometry()?;

    if let Some((_, offset)) = parser.tokens.get(parser.pos) {
        return Err(WktError::TrailingInput(*offset));
    }
    Ok(value)
}

fn format_ordinate(value: f64) -> String {
    let formatted = format!("{:.*}", COORDINATE_PRECISION, value);
    // -0.0000001 rounds to "-0.000000"
    match formatted.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => formatted,
    }
}

fn write_position(out: &mut String, position: &[f64]) {
    let ordinates: Vec<String> = position.iter().map(|v| format_ordinate(*v)).collect();
    out.push_str(&ordinates.join(" "));
}

fn write_positions(out: &mut String, positions: &[Position]) {
    out.push('(');
    for (i, position) in positions.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_position(out, position);
    }
    out.push(')');
}

fn write_polygon(out: &mut String, rings: &[Vec<Position>]) {
    out.push('(');
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_positions(out, ring);
    }
    out.push(')');
}

fn write_list<T>(out: &mut String, items: &[T], mut write: impl FnMut(&mut String, &T)) {
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write(out, item);
    }
    out.push(')');
}

fn write_geometry(out: &mut String, value: &Value) {
    let keyword = match value {
        Value::Point(_) => "POINT",
        Value::LineString(_) => "LINESTRING",
        Value::Polygon(_) => "POLYGON",
        Value::MultiPoint(_) => "MULTIPOINT",
        Value::MultiLineString(_) => "MULTILINESTRING",
        Value::MultiPolygon(_) => "MULTIPOLYGON",
        Value::GeometryCollection(_) => "GEOMETRYCOLLECTION",
    };
    out.push_str(keyword);

    let is_empty = match value {
        Value::Point(p) => p.is_empty(),
        Value::LineString(ls) => ls.is_empty(),
        Value::Polygon(rings) => rings.is_empty(),
        Value::MultiPoint(points) => points.is_empty(),
        Value::MultiLineString(lines) => lines.is_empty(),
        Value::MultiPolygon(polygons) => polygons.is_empty(),
        Value::GeometryCollection(members) => members.is_empty(),
    };
    if is_empty {
        out.push_str(" EMPTY");
        return;
    }

    out.push(' ');
    match value {
        Value::Point(p) => {
            out.push('(');
            write_position(out, p);
            out.push(')');
        }
        Value::LineString(ls) => write_positions(out, ls),
        Value::Polygon(rings) => write_polygon(out, rings),
        Value::MultiPoint(points) => write_list(out, points, |out, p| {
            out.push('(');
            write_position(out, p);
            out.push(')');
        }),
        Value::MultiLineString(lines) => write_list(out, lines, |out, l| write_positions(out, l)),
        Value::MultiPolygon(polygons) => write_list(out, polygons, |out, p| write_polygon(out, p)),
        Value::GeometryCollection(members) => {
            write_list(out, members, |out, g| write_geometry(out, &g.value))
        }
    }
}

/// Write a geometry as canonical WKT.
pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    write_geometry(&mut out, value);
    out
}

/// WKT for a list of features.
///
/// No features gives an empty string, one gives its bare geometry, more are
/// wrapped in a `GEOMETRYCOLLECTION`. Features without geometry are skipped.
pub fn features_to_wkt(features: &[Feature]) -> String {
    let mut geometries: Vec<Geometry> = features
        .iter()
        .filter_map(|f| f.geometry.clone())
        .collect();

    match geometries.len() {
        0 => String::new(),
        1 => stringify(&geometries.remove(0).value),
        _ => stringify(&Value::GeometryCollection(geometries)),
    }
}

/// Re-emit WKT text in canonical form.
pub fn canonicalize(text: &str) -> Result<String, WktError> {
    parse(text).map(|value| stringify(&value))
}
