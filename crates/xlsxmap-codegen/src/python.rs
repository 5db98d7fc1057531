//! openpyxl rendering of sheet programs, shared styles and the entry point.
//!
//! Every quoting and escaping rule for the generated Python lives here.

use std::fmt::Write as _;

use xlsxmap_model::{
    AlignmentAttrs, BorderAttrs, BorderSide, CellScalar, FillAttrs, FontAttrs, ImageAsset,
    StyleAttrs, StyleCategory,
};

use crate::config::GeneratorConfig;
use crate::ir::{SheetProgram, Statement};
use crate::registry::{StyleDeclaration, StyleId};

const INDENT: &str = "    ";

const FILE_HEADER: &str = "\
# -*- coding: utf-8 -*-
# Generated by xlsxmap. Changes are overwritten on the next run.
";

const FORMAT_CELL_HELPER: &str = r#"def format_cell(worksheet: Worksheet,
                row: int,
                column: int,
                value=None,
                font: Font = None,
                alignment: Alignment = None,
                border: Border = None,
                fill: PatternFill = None) -> Cell:
    cell = worksheet.cell(row=row, column=column)
    if value is not None:
        cell.value = value
    if font is not None:
        cell.font = font
    if alignment is not None:
        cell.alignment = alignment
    if border is not None:
        cell.border = border
    if fill is not None:
        cell.fill = fill
    return cell
"#;

/// Single-quoted string literal.
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => push_hex_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Triple-quoted string literal for cell text. Newlines and tabs are kept as-is.
pub fn py_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 6);
    out.push_str("\"\"\"");
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            // A raw CR would be read back as LF.
            '\r' => out.push_str("\\r"),
            '\n' | '\t' => out.push(ch),
            c if c.is_control() => push_hex_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out.push_str("\"\"\"");
    out
}

fn push_hex_escape(out: &mut String, ch: char) {
    let _ = write!(out, "\\x{:02x}", u32::from(ch));
}

/// Float literal that reads back as the same `float` (`12.0`, `0.1`, `1e300`).
pub fn py_float(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "float('inf')".to_string()
        } else {
            "-float('inf')".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

/// Number literal for sizes and dimensions: integral values drop the fractional part.
pub fn py_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        py_float(value)
    }
}

pub fn py_scalar(value: &CellScalar) -> String {
    match value {
        CellScalar::Bool(true) => "True".to_string(),
        CellScalar::Bool(false) => "False".to_string(),
        CellScalar::Int(n) => n.to_string(),
        CellScalar::Float(f) => py_float(*f),
        CellScalar::Text(text) => py_text(text),
    }
}

/// Whether `name` can be used as a module or function name.
///
/// Only ASCII digits are accepted after the first character; other numeric characters such as
/// `²` or `½` pass `char::is_alphanumeric` but are rejected by Python.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphabetic() || c.is_ascii_digit())
        }
        _ => false,
    }
}

fn py_optional_scalar(value: Option<&CellScalar>) -> String {
    value.map_or_else(|| "None".to_string(), py_scalar)
}

fn py_style_ref(id: Option<StyleId>) -> String {
    id.map_or_else(|| "None".to_string(), |id| id.to_string())
}

/// Comments are single-line; control characters become spaces.
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Constructor expression for one shared style.
#[must_use]
pub fn style_declaration(attrs: &StyleAttrs) -> String {
    match attrs {
        StyleAttrs::Font(font) => font_declaration(font),
        StyleAttrs::Fill(fill) => fill_declaration(fill),
        StyleAttrs::Border(border) => border_declaration(border),
        StyleAttrs::Alignment(alignment) => alignment_declaration(alignment),
    }
}

fn font_declaration(font: &FontAttrs) -> String {
    let mut args = Vec::new();
    if font.bold {
        args.push("bold=True".to_string());
    }
    if font.italic {
        args.push("italic=True".to_string());
    }
    if let Some(size) = font.size {
        args.push(format!("size={}", py_number(size)));
    }
    if let Some(name) = &font.name {
        args.push(format!("name={}", py_str(name)));
    }
    if let Some(color) = &font.color {
        args.push(format!("color={}", py_str(color)));
    }
    format!("Font({})", args.join(", "))
}

fn fill_declaration(fill: &FillAttrs) -> String {
    let color = py_str(&fill.color);
    format!(
        "PatternFill(start_color={color}, end_color={color}, fill_type={})",
        py_str(fill.pattern.as_str())
    )
}

fn side_declaration(side: &BorderSide) -> String {
    let mut args = Vec::new();
    if let Some(style) = &side.style {
        args.push(format!("border_style={}", py_str(style)));
    }
    if let Some(color) = &side.color {
        args.push(format!("color={}", py_str(color)));
    }
    format!("Side({})", args.join(", "))
}

fn border_declaration(border: &BorderAttrs) -> String {
    let sides: Vec<String> = border
        .sides()
        .map(|(edge, side)| format!("{edge}={}", side_declaration(side)))
        .collect();
    format!("Border({})", sides.join(", "))
}

fn alignment_declaration(alignment: &AlignmentAttrs) -> String {
    let mut args = Vec::new();
    if let Some(horizontal) = &alignment.horizontal {
        args.push(format!("horizontal={}", py_str(horizontal)));
    }
    if let Some(vertical) = &alignment.vertical {
        args.push(format!("vertical={}", py_str(vertical)));
    }
    if let Some(degrees) = alignment.text_rotation {
        args.push(format!("text_rotation={degrees}"));
    }
    format!("Alignment({})", args.join(", "))
}

fn render_image(out: &mut String, asset: &ImageAsset, config: &GeneratorConfig) {
    let body = format!("{INDENT}{INDENT}");
    let _ = writeln!(out, "{INDENT}try:");
    let _ = writeln!(
        out,
        "{body}img = Image(Path(__file__).parent / {} / {})",
        py_str(&config.images_dir),
        py_str(&asset.filename)
    );
    let _ = writeln!(
        out,
        "{body}img.width, img.height = {}, {}",
        py_number(asset.width),
        py_number(asset.height)
    );
    let _ = writeln!(out, "{body}ws.add_image(img, {})", py_str(&asset.anchor));
    let _ = writeln!(out, "{INDENT}except Exception as e:");
    let message = format!(" [!] Error loading image {}: ", asset.filename);
    let _ = writeln!(out, "{body}print({} + str(e))", py_str(&message));
}

fn render_statement(out: &mut String, stmt: &Statement, config: &GeneratorConfig) {
    match stmt {
        Statement::Section(label) => {
            let _ = writeln!(out, "{INDENT}# {}", comment_text(label));
        }
        Statement::ColumnWidth { column, width } => {
            let _ = writeln!(
                out,
                "{INDENT}ws.column_dimensions[{}].width = {}",
                py_str(column),
                py_number(*width)
            );
        }
        Statement::RowHeight { row, height } => {
            let _ = writeln!(
                out,
                "{INDENT}ws.row_dimensions[{row}].height = {}",
                py_number(*height)
            );
        }
        Statement::Merge { range } => {
            let _ = writeln!(out, "{INDENT}ws.merge_cells({})", py_str(range));
        }
        Statement::FormatCell {
            row,
            col,
            value,
            styles,
        } => {
            let _ = writeln!(
                out,
                "{INDENT}format_cell(ws, {row}, {col}, {}, {}, {}, {}, {})",
                py_optional_scalar(value.as_ref()),
                py_style_ref(styles.font),
                py_style_ref(styles.alignment),
                py_style_ref(styles.border),
                py_style_ref(styles.fill)
            );
        }
        Statement::SetValue { coordinate, value } => {
            let _ = writeln!(
                out,
                "{INDENT}ws[{}].value = {}",
                py_str(coordinate),
                py_scalar(value)
            );
        }
        Statement::SetFormula {
            coordinate,
            formula,
        } => {
            let _ = writeln!(
                out,
                "{INDENT}ws[{}].value = {}",
                py_str(coordinate),
                py_str(formula)
            );
        }
        Statement::AssignStyle { coordinate, id } => {
            let _ = writeln!(
                out,
                "{INDENT}ws[{}].{} = {id}",
                py_str(coordinate),
                id.category().cell_attribute()
            );
        }
        Statement::AddImage(asset) => render_image(out, asset, config),
    }
}

/// Module defining `build_<name>(wb)`, which adds and populates one sheet.
#[must_use]
pub fn render_sheet_module(program: &SheetProgram, config: &GeneratorConfig) -> String {
    let has_images = program
        .statements
        .iter()
        .any(|stmt| matches!(stmt, Statement::AddImage(_)));

    let mut out = String::from(FILE_HEADER);
    out.push('\n');
    if has_images {
        out.push_str("from pathlib import Path\n\n");
        out.push_str("from openpyxl.drawing.image import Image\n\n");
    }
    let _ = writeln!(out, "from {} import *", config.styles_module);
    out.push_str("\n\n");

    let _ = writeln!(out, "def {}(wb):", program.builder_name);
    let _ = writeln!(
        out,
        "{INDENT}ws = wb.create_sheet(title={})",
        py_str(&program.title)
    );
    for stmt in &program.statements {
        if matches!(stmt, Statement::Section(_)) {
            out.push('\n');
        }
        render_statement(&mut out, stmt, config);
    }
    out.push('\n');
    let done = format!("   [+] Sheet {} completed.", program.title);
    let _ = writeln!(out, "{INDENT}print({})", py_str(&done));
    out
}

/// Module holding `format_cell` and every shared style, grouped by category.
#[must_use]
pub fn render_styles_module(declarations: &[StyleDeclaration]) -> String {
    let mut out = String::from(FILE_HEADER);
    out.push('\n');
    out.push_str("from openpyxl.cell.cell import Cell\n");
    out.push_str("from openpyxl.styles import Alignment, Border, Font, PatternFill, Side\n");
    out.push_str("from openpyxl.worksheet.worksheet import Worksheet\n");
    out.push_str("\n\n");
    out.push_str(FORMAT_CELL_HELPER);

    for category in StyleCategory::ALL {
        out.push_str("\n\n");
        let _ = writeln!(out, "# {}", category.plural().to_uppercase());
        for decl in declarations.iter().filter(|d| d.id.category() == category) {
            let _ = writeln!(out, "{} = {}", decl.id, decl.declaration);
        }
    }
    out
}

/// Entry point creating the workbook, running every sheet builder in order and saving it.
#[must_use]
pub fn render_entry_module(sheets: &[SheetProgram], config: &GeneratorConfig) -> String {
    let mut out = String::from(FILE_HEADER);
    out.push('\n');
    out.push_str("import sys\n");
    out.push_str("from pathlib import Path\n\n");
    out.push_str("import openpyxl\n\n");
    out.push_str("sys.path.insert(0, str(Path(__file__).parent))\n\n");
    for program in sheets {
        let _ = writeln!(
            out,
            "from {} import {}  # noqa: E402",
            program.module_name, program.builder_name
        );
    }
    out.push_str("\n\n");

    out.push_str("def main():\n");
    let _ = writeln!(out, "{INDENT}wb = openpyxl.Workbook()");
    let _ = writeln!(out, "{INDENT}if 'Sheet' in wb.sheetnames:");
    let _ = writeln!(out, "{INDENT}{INDENT}wb.remove(wb['Sheet'])");
    for program in sheets {
        let _ = writeln!(out, "{INDENT}{}(wb)", program.builder_name);
    }
    let _ = writeln!(
        out,
        "{INDENT}output_file = {}",
        py_str(&config.output_workbook)
    );
    let _ = writeln!(out, "{INDENT}wb.save(output_file)");
    let _ = writeln!(
        out,
        "{INDENT}print(f\"[!] Success: '{{output_file}}' generated.\")"
    );
    out.push_str("\n\n");
    out.push_str("if __name__ == '__main__':\n");
    let _ = writeln!(out, "{INDENT}main()");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xlsxmap_model::FillPattern;

    use crate::ir::CellStyles;

    #[test]
    fn identifiers_reject_non_digit_numerics() {
        assert!(is_identifier("sheet_Preços"));
        assert!(is_identifier("_q1"));
        assert!(!is_identifier("1q"));
        assert!(!is_identifier("sheet_Area²"));
        assert!(!is_identifier("sheet_½"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn py_str_escapes_quotes_and_controls() {
        assert_eq!(py_str("it's"), r"'it\'s'");
        assert_eq!(py_str(r"C:\tmp"), r"'C:\\tmp'");
        assert_eq!(py_str("a\nb\tc\r"), r"'a\nb\tc\r'");
        assert_eq!(py_str("\u{1}"), r"'\x01'");
        assert_eq!(py_str("Preços"), "'Preços'");
    }

    #[test]
    fn py_text_tolerates_quotes_and_newlines() {
        assert_eq!(py_text("say \"hi\"\nbye"), "\"\"\"say \\\"hi\\\"\nbye\"\"\"");
        // A trailing quote must not merge with the closing delimiter.
        assert_eq!(py_text("x\""), "\"\"\"x\\\"\"\"\"");
        assert_eq!(py_text("a\\b"), "\"\"\"a\\\\b\"\"\"");
    }

    #[test]
    fn numbers_render_as_python_literals() {
        assert_eq!(py_scalar(&CellScalar::Int(-7)), "-7");
        assert_eq!(py_scalar(&CellScalar::Float(12.0)), "12.0");
        assert_eq!(py_scalar(&CellScalar::Float(0.1)), "0.1");
        assert_eq!(py_scalar(&CellScalar::Float(f64::NAN)), "float('nan')");
        assert_eq!(
            py_scalar(&CellScalar::Float(f64::NEG_INFINITY)),
            "-float('inf')"
        );
        assert_eq!(py_scalar(&CellScalar::Bool(false)), "False");
        assert_eq!(py_number(18.0), "18");
        assert_eq!(py_number(18.5), "18.5");
    }

    #[test]
    fn style_declarations() {
        let font = StyleAttrs::Font(FontAttrs {
            bold: true,
            italic: true,
            size: Some(10.5),
            name: Some("Arial".into()),
            color: Some("FF0000".into()),
        });
        assert_eq!(
            style_declaration(&font),
            "Font(bold=True, italic=True, size=10.5, name='Arial', color='FF0000')"
        );

        let fill = StyleAttrs::Fill(FillAttrs {
            color: "FFFF00".into(),
            pattern: FillPattern::Solid,
        });
        assert_eq!(
            style_declaration(&fill),
            "PatternFill(start_color='FFFF00', end_color='FFFF00', fill_type='solid')"
        );

        let border = StyleAttrs::Border(BorderAttrs {
            bottom: Some(BorderSide::new("thin", "FF000000")),
            left: Some(BorderSide {
                style: Some("medium".into()),
                color: None,
            }),
            ..Default::default()
        });
        assert_eq!(
            style_declaration(&border),
            "Border(left=Side(border_style='medium'), \
             bottom=Side(border_style='thin', color='FF000000'))"
        );

        let alignment = StyleAttrs::Alignment(AlignmentAttrs {
            horizontal: Some("center".into()),
            vertical: None,
            text_rotation: Some(90),
        });
        assert_eq!(
            style_declaration(&alignment),
            "Alignment(horizontal='center', text_rotation=90)"
        );
    }

    #[test]
    fn sheet_module_layout() {
        let mut program = SheetProgram::new("Q1Report", "Q1 Report!");
        program.push_group(
            "Values and styles",
            vec![Statement::FormatCell {
                row: 1,
                col: 1,
                value: Some(CellScalar::Text("Total".into())),
                styles: CellStyles {
                    font: Some(StyleId::new(StyleCategory::Font, 1)),
                    ..Default::default()
                },
            }],
        );
        program.push_group(
            "Formulas",
            vec![Statement::SetFormula {
                coordinate: "B1".into(),
                formula: "=IF(A1=\"x\",'y',1)".into(),
            }],
        );

        let expected = r#"# -*- coding: utf-8 -*-
# Generated by xlsxmap. Changes are overwritten on the next run.

from common import *


def build_Q1Report(wb):
    ws = wb.create_sheet(title='Q1 Report!')

    # Values and styles
    format_cell(ws, 1, 1, """Total""", FONT_001, None, None, None)

    # Formulas
    ws['B1'].value = '=IF(A1="x",\'y\',1)'

    print('   [+] Sheet Q1 Report! completed.')
"#;
        assert_eq!(
            render_sheet_module(&program, &GeneratorConfig::default()),
            expected
        );
    }

    #[test]
    fn image_loading_is_wrapped_in_try() {
        let mut program = SheetProgram::new("Art", "Art");
        program.push_group(
            "Images",
            vec![Statement::AddImage(ImageAsset::new(
                "logo.png", 120.0, 40.0, "E2",
            ))],
        );

        let rendered = render_sheet_module(&program, &GeneratorConfig::default());
        let expected_block = "    # Images
    try:
        img = Image(Path(__file__).parent / 'images' / 'logo.png')
        img.width, img.height = 120, 40
        ws.add_image(img, 'E2')
    except Exception as e:
        print(' [!] Error loading image logo.png: ' + str(e))
";
        assert!(rendered.contains(expected_block), "{rendered}");
        assert!(rendered.contains("from pathlib import Path\n"));
        assert!(rendered.contains("from openpyxl.drawing.image import Image\n"));
    }

    #[test]
    fn per_attribute_statements() {
        let mut out = String::new();
        let config = GeneratorConfig::default();
        render_statement(
            &mut out,
            &Statement::SetValue {
                coordinate: "C3".into(),
                value: CellScalar::Float(2.5),
            },
            &config,
        );
        render_statement(
            &mut out,
            &Statement::AssignStyle {
                coordinate: "C3".into(),
                id: StyleId::new(StyleCategory::Alignment, 2),
            },
            &config,
        );
        render_statement(
            &mut out,
            &Statement::RowHeight {
                row: 3,
                height: 22.25,
            },
            &config,
        );
        assert_eq!(
            out,
            "    ws['C3'].value = 2.5\n    ws['C3'].alignment = ALIGN_002\n    ws.row_dimensions[3].height = 22.25\n"
        );
    }

    #[test]
    fn styles_module_lists_every_category() {
        let declarations = vec![
            StyleDeclaration {
                id: StyleId::new(StyleCategory::Font, 1),
                declaration: "Font(bold=True)".into(),
            },
            StyleDeclaration {
                id: StyleId::new(StyleCategory::Alignment, 1),
                declaration: "Alignment(horizontal='center')".into(),
            },
        ];
        let rendered = render_styles_module(&declarations);

        assert!(rendered.contains("def format_cell(worksheet: Worksheet,\n"));
        assert!(rendered.contains("    if value is not None:\n        cell.value = value\n"));
        assert!(rendered.ends_with(
            "# FONTS\nFONT_001 = Font(bold=True)\n\n\n# FILLS\n\n\n# BORDERS\n\n\n\
             # ALIGNMENTS\nALIGN_001 = Alignment(horizontal='center')\n"
        ));
    }

    #[test]
    fn entry_module_runs_builders_in_order() {
        let sheets = vec![
            SheetProgram::new("Sales", "Sales"),
            SheetProgram::new("Notes", "Notes"),
        ];
        let rendered = render_entry_module(&sheets, &GeneratorConfig::default());

        let expected = r#"# -*- coding: utf-8 -*-
# Generated by xlsxmap. Changes are overwritten on the next run.

import sys
from pathlib import Path

import openpyxl

sys.path.insert(0, str(Path(__file__).parent))

from sheet_Sales import build_Sales  # noqa: E402
from sheet_Notes import build_Notes  # noqa: E402


def main():
    wb = openpyxl.Workbook()
    if 'Sheet' in wb.sheetnames:
        wb.remove(wb['Sheet'])
    build_Sales(wb)
    build_Notes(wb)
    output_file = 'output.xlsx'
    wb.save(output_file)
    print(f"[!] Success: '{output_file}' generated.")


if __name__ == '__main__':
    main()
"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn comments_stay_on_one_line() {
        assert_eq!(comment_text("a\nb"), "a b");
    }
}
