use std::io::Write;

use itertools::Itertools;
use prettytable::{format, Cell, Row, Table};

use crate::cli::OutputArgs;
use crate::views::View;

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

// Python literal float: always carries a decimal point or exponent
fn literal(v: f64) -> String {
    format!("{:?}", v)
}

/// One `name = {'Title': {key: value, ...}, ...}` line per view, the form the
/// plotting scripts paste in directly.
pub fn write_bindings<W: Write>(w: &mut W, views: &[View]) -> std::io::Result<()> {
    for view in views {
        let body = view
            .series
            .iter()
            .map(|s| {
                let points = s.points.iter().map(|(d, v)| format!("{}: {}", d, literal(*v))).join(", ");
                format!("{}: {{{}}}", quote(&s.title), points)
            })
            .join(", ");
        writeln!(w, "{} = {{{}}}", view.name, body)?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(w: &mut W, views: &[View], od: &str) -> std::io::Result<()> {
    writeln!(w, "{}", ["view", "series", "key", "value"].join(od))?;
    for view in views {
        for s in &view.series {
            for (d, v) in &s.points {
                writeln!(w, "{}{od}{}{od}{}{od}{:.3}", view.name, s.title, d, v, od = od)?;
            }
        }
    }
    Ok(())
}

pub fn build_table(views: &[View]) -> Table {
    let mut celltable = Table::new();
    celltable.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    celltable.set_titles(Row::new(vec![Cell::new("view"), Cell::new("series"), Cell::new("key"), Cell::new("value")]));
    for view in views {
        for s in &view.series {
            for (d, v) in &s.points {
                celltable.add_row(Row::new(vec![
                    Cell::new(&view.name),
                    Cell::new(&s.title),
                    Cell::new(&d.to_string()),
                    Cell::new(&format!("{:.3}", v)),
                ]));
            }
        }
    }
    celltable
}

/// Write `views` in the form `out` asks for.
pub fn write_views<W: Write>(w: &mut W, views: &[View], out: &OutputArgs) -> std::io::Result<()> {
    if out.table {
        build_table(views).print(w)?;
    } else if out.csv_output {
        write_csv(w, views, &out.od)?;
    } else {
        write_bindings(w, views)?;
    }
    w.flush()
}
