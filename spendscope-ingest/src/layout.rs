//! Position-aware page text.
//!
//! Statement tables are usually drawn cell by cell: one text object per cell,
//! or one text object with a `Td` hop between cells. Each shown string is
//! placed on the page through the text and graphics matrices, runs sharing a
//! baseline become one row, and a row's cells are joined left to right.

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Separator between cells of one row; the line parsers split columns on runs of spaces.
const CELL_GAP: &str = "  ";

/// Affine matrix `[a b c d e f]` in PDF row-vector order.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let v = floats(operands)?;
        let m: [f32; 6] = v.get(..6)?.try_into().ok()?;
        Some(Matrix(m))
    }

    /// `self` applied first, then `other`
    fn then(&self, other: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a * a2 + b * c2,
            a * b2 + b * d2,
            c * a2 + d * c2,
            c * b2 + d * d2,
            e * a2 + f * c2 + e2,
            e * b2 + f * d2 + f2,
        ])
    }

    fn origin(&self) -> (f32, f32) {
        (self.0[4], self.0[5])
    }

    fn vertical_scale(&self) -> f32 {
        self.0[2].hypot(self.0[3])
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    x: f32,
    y: f32,
    /// Rendered font height
    size: f32,
    text: String,
}

struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    font: Option<Vec<u8>>,
    font_size: f32,
    /// Last show operator left the pen where the next string starts.
    continues: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            leading: 0.0,
            font: None,
            font_size: 0.0,
            continues: false,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translate(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
        self.continues = false;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, text: String, runs: &mut Vec<TextRun>) {
        if text.is_empty() {
            return;
        }
        if self.continues {
            if let Some(last) = runs.last_mut() {
                last.text.push_str(&text);
                return;
            }
        }
        let placed = self.tm.then(&self.ctm);
        let (x, y) = placed.origin();
        runs.push(TextRun {
            x,
            y,
            size: self.font_size * placed.vertical_scale(),
            text,
        });
        self.continues = true;
    }
}

/// Text of one page, one line per visual row, top to bottom.
pub fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings = font_encodings(doc, page_id)?;
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut state = TextState::new();
    let mut runs = Vec::new();
    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => state.saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.saved.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.ctm = m.then(&state.ctm);
                }
            }
            "BT" => {
                state.tm = Matrix::IDENTITY;
                state.tlm = Matrix::IDENTITY;
                state.continues = false;
            }
            "ET" => state.continues = false,
            "Tf" => {
                state.font = operands.first().and_then(|o| o.as_name().ok()).map(<[u8]>::to_vec);
                state.font_size = operands.get(1).and_then(|o| o.as_float().ok()).unwrap_or(0.0);
            }
            "TL" => {
                if let Some(tl) = operands.first().and_then(|o| o.as_float().ok()) {
                    state.leading = tl;
                }
            }
            "Td" | "TD" => {
                if let Some(&[tx, ty, ..]) = floats(operands).as_deref() {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.tlm = m;
                    state.tm = m;
                    state.continues = false;
                }
            }
            "T*" => state.next_line(),
            "Tj" | "TJ" | "'" | "\"" => {
                if op.operator == "'" || op.operator == "\"" {
                    state.next_line();
                }
                let shown = match op.operator.as_str() {
                    "\"" => operands.get(2..).unwrap_or(&[]),
                    _ => operands,
                };
                let encoding = state.font.as_ref().and_then(|f| encodings.get(f));
                match encoding {
                    Some(encoding) => {
                        let mut text = String::new();
                        decode_operands(&mut text, encoding, shown);
                        state.show(text, &mut runs);
                    }
                    None => debug!("text shown without a decodable font; skipped"),
                }
            }
            _ => {}
        }
    }

    Ok(rows(runs).join("\n"))
}

/// Encodings for the page's fonts; a font whose encoding lopdf cannot
/// build is left out rather than failing the page.
fn font_encodings(doc: &Document, page_id: ObjectId) -> lopdf::Result<BTreeMap<Vec<u8>, Encoding<'_>>> {
    let mut encodings = BTreeMap::new();
    for (name, font) in doc.get_page_fonts(page_id)? {
        match font.get_font_encoding(doc) {
            Ok(encoding) => {
                encodings.insert(name, encoding);
            }
            Err(e) => warn!(font = %String::from_utf8_lossy(&name), error = %e, "unsupported font encoding"),
        }
    }
    Ok(encodings)
}

/// Strings of a `Tj`/`TJ` operand list. Large negative kerning in a `TJ`
/// array is a word gap.
fn decode_operands(text: &mut String, encoding: &Encoding<'_>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => match Document::decode_text(encoding, bytes) {
                Ok(s) => text.push_str(&s),
                Err(e) => debug!(error = %e, "undecodable string"),
            },
            Object::Array(items) => decode_operands(text, encoding, items),
            Object::Integer(_) | Object::Real(_) => {
                if operand.as_float().is_ok_and(|k| k < -100.0) && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn floats(operands: &[Object]) -> Option<Vec<f32>> {
    operands.iter().map(|o| o.as_float().ok()).collect()
}

/// Group runs into rows by baseline (top of page first) and join each row's
/// cells in reading order.
fn rows(mut runs: Vec<TextRun>) -> Vec<String> {
    runs.retain(|r| !r.text.trim().is_empty());
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut grouped: Vec<(f32, Vec<TextRun>)> = Vec::new();
    for run in runs {
        let tolerance = (run.size * 0.5).max(1.0);
        match grouped.last_mut() {
            Some((baseline, row)) if (*baseline - run.y).abs() <= tolerance => row.push(run),
            _ => grouped.push((run.y, vec![run])),
        }
    }

    grouped
        .into_iter()
        .map(|(_, mut row)| {
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            row.iter()
                .map(|r| r.text.trim())
                .collect::<Vec<_>>()
                .join(CELL_GAP)
        })
        .collect()
}
