use console::Style;

use crate::mutants::TestSuiteOutcome;
use crate::report::MuterTestReport;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_report(report: &MuterTestReport) {
    println!("{}", description(report, true));
}

struct Cell {
    text: String,
    style: Option<Style>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }
}

/// Color for a score: red up to 25, yellow up to 50, bright green up to 75, green above.
fn score_style(score: i64) -> Style {
    match score {
        ..=25 => Style::new().red(),
        26..=50 => Style::new().yellow(),
        51..=75 => Style::new().green().bright(),
        _ => Style::new().green(),
    }
}

/// Survivors are red, killed mutants green.
fn outcome_style(outcome: TestSuiteOutcome) -> Style {
    match outcome {
        TestSuiteOutcome::Passed => Style::new().red(),
        TestSuiteOutcome::Failed => Style::new().green(),
        TestSuiteOutcome::BuildError | TestSuiteOutcome::RuntimeError => Style::new().yellow(),
    }
}

fn render_table(headers: &[&str], rows: &[Vec<Cell>], styled: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.text.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header_cells: Vec<Cell> = headers.iter().map(|h| Cell::plain(*h)).collect();
    let underline_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::plain("-".repeat(h.chars().count())))
        .collect();
    lines.push(render_row(&header_cells, &widths, styled));
    lines.push(render_row(&underline_cells, &widths, styled));
    for row in rows {
        lines.push(render_row(row, &widths, styled));
    }
    lines.join("\n")
}

fn render_row(cells: &[Cell], widths: &[usize], styled: bool) -> String {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let padding = if i == last {
            0
        } else {
            widths[i] - cell.text.chars().count() + 3
        };
        match (&cell.style, styled) {
            (Some(style), true) => line.push_str(&style.apply_to(&cell.text).to_string()),
            _ => line.push_str(&cell.text),
        }
        line.push_str(&" ".repeat(padding));
    }
    line
}

fn applied_operators_table(report: &MuterTestReport, styled: bool) -> String {
    let rows: Vec<Vec<Cell>> = report
        .file_reports
        .iter()
        .flat_map(|file| {
            file.applied_operators.iter().map(|applied| {
                vec![
                    Cell::plain(file.file_name.as_str()),
                    Cell::plain(applied.position.to_string()),
                    Cell::plain(applied.id.description()),
                    Cell::styled(
                        applied.test_suite_outcome.as_str(),
                        outcome_style(applied.test_suite_outcome),
                    ),
                ]
            })
        })
        .collect();
    render_table(
        &["File", "Position", "Applied Mutation Operator", "Mutation Test Result"],
        &rows,
        styled,
    )
}

fn scores_table(report: &MuterTestReport, styled: bool) -> String {
    let rows: Vec<Vec<Cell>> = report
        .file_reports
        .iter()
        .map(|file| {
            vec![
                Cell::plain(file.file_name.as_str()),
                Cell::plain(file.applied_operators.len().to_string()),
                Cell::styled(file.mutation_score.to_string(), score_style(file.mutation_score)),
            ]
        })
        .collect();
    render_table(
        &["File", "# of Applied Mutation Operators", "Mutation Score"],
        &rows,
        styled,
    )
}

/// The human-readable report. `styled` adds terminal colors.
pub fn description(report: &MuterTestReport, styled: bool) -> String {
    let score_text = format!("{}/100", report.global_mutation_score);
    let label = "Mutation Score of Test Suite (higher is better)";
    let (score_label, score) = if styled {
        (
            Style::new().bold().apply_to(label).to_string(),
            score_style(report.global_mutation_score).apply_to(score_text).to_string(),
        )
    } else {
        (label.to_string(), score_text)
    };

    format!(
        "Muter finished running!\n\n\
         --------------------------\n\
         Applied Mutation Operators\n\
         --------------------------\n\n\
         These are all of the ways that Muter introduced changes into your code.\n\n\
         In total, Muter applied {total} mutation operators.\n\n\
         {applied}\n\n\n\n\
         --------------------\n\
         Mutation Test Scores\n\
         --------------------\n\n\
         These are the mutation scores for your test suite, as well as the files \
         that had mutants introduced into them.\n\n\
         Mutation scores ignore build & runtime errors.\n\n\
         {score_label}: {score}\n\n\
         {scores}",
        total = report.total_applied_mutation_operators,
        applied = applied_operators_table(report, styled),
        scores = scores_table(report, styled),
    )
}
