//! Console output

use ferrum_client::{Bundle, IterationReport};
use std::io::{self, Write};

/// `"<first given> <family> <birthDate>"` for every patient name, sorted.
pub fn patient_lines(bundle: &Bundle) -> ferrum_models::Result<Vec<String>> {
    let mut lines: Vec<String> = bundle
        .patients()?
        .iter()
        .flat_map(|patient| patient.name_lines())
        .collect();
    lines.sort();
    Ok(lines)
}

pub fn iteration_line(report: &IterationReport) -> String {
    format!(
        "Average Response Time for Execution iteration {} is {:.2}ms",
        report.iteration, report.average_millis
    )
}

pub fn write_lines<W, I>(out: &mut W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    out.flush()
}
