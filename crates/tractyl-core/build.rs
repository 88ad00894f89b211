use std::collections::HashSet;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

const TABLE: &str = "keycodes.tbl";

struct Row {
    code: u16,
    constant: Option<String>,
    names: Vec<String>,
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn parse_row(line_no: usize, line: &str) -> Row {
    let mut fields = line.split_whitespace();
    let usage = fields.next().unwrap_or_default();
    let code = usage
        .strip_prefix("0x")
        .and_then(|hex| u16::from_str_radix(hex, 16).ok())
        .unwrap_or_else(|| panic!("{}:{}: bad usage {:?}", TABLE, line_no, usage));

    let constant = match fields.next() {
        Some("-") => None,
        Some(c) if is_ident(c) => Some(c.to_string()),
        other => panic!("{}:{}: bad constant {:?}", TABLE, line_no, other),
    };

    let names: Vec<String> = fields.map(str::to_string).collect();
    if names.is_empty() {
        panic!("{}:{}: usage {:#06x} has no names", TABLE, line_no, code);
    }
    if let Some(bad) = names.iter().find(|n| !is_ident(n)) {
        panic!("{}:{}: bad name {:?}", TABLE, line_no, bad);
    }
    Row { code, constant, names }
}

fn parse_table(src: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut codes = HashSet::new();
    let mut names = HashSet::new();

    for (i, line) in src.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let row = parse_row(i + 1, line);
        if !codes.insert(row.code) {
            panic!("{}:{}: usage {:#06x} listed twice", TABLE, i + 1, row.code);
        }
        for name in &row.names {
            if !names.insert(name.clone()) {
                panic!("{}:{}: name {} listed twice", TABLE, i + 1, name);
            }
        }
        rows.push(row);
    }
    rows
}

fn render(rows: &[Row]) -> String {
    let mut out = String::from("// Generated from keycodes.tbl\n\n");
    for row in rows {
        if let Some(constant) = &row.constant {
            out.push_str(&format!(
                "pub const KC_{}: Keycode = Keycode({:#06x});\n",
                constant, row.code
            ));
        }
    }

    out.push_str("\n/// Named keycodes, first entry per code is the canonical display name\n");
    out.push_str("const NAMED: &[(&str, u16)] = &[\n");
    for row in rows {
        for name in &row.names {
            out.push_str(&format!("    ({:?}, {:#06x}),\n", name, row.code));
        }
    }
    out.push_str("];\n");
    out
}

fn main() -> io::Result<()> {
    let src = fs::read_to_string(TABLE)?;
    let rows = parse_table(&src);

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    fs::write(Path::new(&out_dir).join("keycode_table.rs"), render(&rows))?;

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", TABLE);
    Ok(())
}
