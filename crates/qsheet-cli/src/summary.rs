//! Terminal rendering of command output.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use qsheet_core::{CommandOutcome, Statistics, TopicInsight};
use qsheet_model::{Difficulty, Question, Tree};

use crate::commands::Output;

/// Render `output` as text for the terminal.
pub fn render(output: &Output) -> String {
    match output {
        Output::Sheet { tree, query } => render_sheet(tree, query.as_deref()),
        Output::Stats(stats) => render_stats(stats),
        Output::Insights(insights) => render_insights(insights),
        Output::Created { kind, id } => format!("Added {kind} {id}"),
        Output::Outcome { action, outcome } => match outcome {
            CommandOutcome::Applied => format!("{action}: done"),
            CommandOutcome::Unchanged => format!("{action}: nothing changed"),
        },
        Output::Exported { path: Some(path), .. } => {
            format!("Exported sheet to {}", path.display())
        }
        Output::Exported { path: None, json } => json.clone(),
        Output::Imported {
            slug,
            topics,
            questions,
            outcome,
        } => match outcome {
            CommandOutcome::Applied => format!(
                "Imported '{slug}': {topics} topics, {questions} questions (undo to restore the previous sheet)"
            ),
            CommandOutcome::Unchanged => format!("'{slug}' matches the current sheet"),
        },
        Output::History {
            position,
            len,
            max_size,
        } => format!("History: position {position} of {len} (keeps {max_size} undo steps)"),
        Output::Message(message) => message.clone(),
    }
}

/// Print `output` to stdout.
pub fn print_output(output: &Output) {
    println!("{}", render(output));
}

fn render_sheet(tree: &Tree, query: Option<&str>) -> String {
    if tree.is_empty() {
        return match query {
            Some(query) => format!("No matches for '{query}'."),
            None => "The sheet is empty. Add a topic with `add-topic`.".to_string(),
        };
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Item"),
        header_cell("Difficulty"),
        header_cell("Done"),
    ]);
    apply_sheet_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);

    for topic in tree.topics() {
        table.add_row(vec![
            Cell::new(topic.id.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&topic.title)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            progress_cell(topic.completed_count(), topic.question_count()),
        ]);
        for sub_topic in &topic.sub_topics {
            table.add_row(vec![
                Cell::new(sub_topic.id.as_str()).fg(Color::Cyan),
                Cell::new(format!("  {}", sub_topic.title)).fg(Color::Cyan),
                dim_cell("-"),
                progress_cell(sub_topic.completed_count(), sub_topic.questions.len()),
            ]);
            for question in &sub_topic.questions {
                table.add_row(question_row(question));
            }
        }
    }

    match query {
        Some(query) => format!("Search: {query}\n{table}"),
        None => table.to_string(),
    }
}

fn question_row(question: &Question) -> Vec<Cell> {
    let mut text = format!("    {}", question.text);
    if let Some(link) = &question.link {
        text.push_str(&format!("\n    {link}"));
    }
    vec![
        dim_cell(question.id.as_str()),
        Cell::new(text),
        difficulty_cell(question.difficulty.as_ref()),
        if question.completed {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        },
    ]
}

fn render_stats(stats: &Statistics) -> String {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_compact_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Topics"), Cell::new(stats.total_topics)]);
    table.add_row(vec![
        Cell::new("Sub-topics"),
        Cell::new(stats.total_sub_topics),
    ]);
    table.add_row(vec![
        Cell::new("Questions"),
        Cell::new(stats.total_questions),
    ]);
    table.add_row(vec![
        Cell::new("Completed"),
        Cell::new(stats.completed_questions).fg(Color::Green),
    ]);
    table.add_row(vec![Cell::new("Remaining"), Cell::new(stats.remaining())]);
    table.add_row(vec![
        Cell::new("Progress").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}%", stats.progress)).add_attribute(Attribute::Bold),
    ]);
    table.to_string()
}

fn render_insights(insights: &[TopicInsight]) -> String {
    if insights.is_empty() {
        return "No topics yet.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Topic"),
        header_cell("Done"),
        header_cell("Total"),
        header_cell("Progress"),
    ]);
    apply_compact_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for insight in insights {
        let progress = Cell::new(format!("{:.1}%", insight.progress));
        table.add_row(vec![
            Cell::new(&insight.title),
            Cell::new(insight.completed),
            Cell::new(insight.total),
            if insight.needs_attention() {
                progress.fg(Color::Yellow)
            } else {
                progress.fg(Color::Green)
            },
        ]);
    }
    table.to_string()
}

fn progress_cell(completed: usize, total: usize) -> Cell {
    let cell = Cell::new(format!("{completed}/{total}"));
    if total > 0 && completed == total {
        cell.fg(Color::Green)
    } else {
        cell
    }
}

fn difficulty_cell(difficulty: Option<&Difficulty>) -> Cell {
    match difficulty {
        Some(Difficulty::Easy) => Cell::new("Easy").fg(Color::Green),
        Some(Difficulty::Medium) => Cell::new("Medium").fg(Color::Yellow),
        Some(Difficulty::Hard) => Cell::new("Hard").fg(Color::Red),
        Some(other) => Cell::new(other.label()),
        None => dim_cell("-"),
    }
}

fn apply_sheet_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_compact_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use qsheet_core::{compute_statistics, filter_tree, topic_insights};
    use qsheet_model::default_tree;

    use super::*;

    #[test]
    fn sheet_lists_every_level() {
        let rendered = render(&Output::Sheet {
            tree: default_tree(),
            query: None,
        });
        assert!(rendered.contains("Arrays & Hashing"));
        assert!(rendered.contains("Easy Problems"));
        assert!(rendered.contains("Two Sum"));
        assert!(rendered.contains("q-13"));
    }

    #[test]
    fn empty_search_result_names_the_query() {
        let tree = filter_tree(&default_tree(), "zzz");
        let rendered = render(&Output::Sheet {
            tree,
            query: Some("zzz".to_string()),
        });
        assert_eq!(rendered, "No matches for 'zzz'.");
    }

    #[test]
    fn stats_show_progress() {
        let rendered = render(&Output::Stats(compute_statistics(&default_tree())));
        assert!(rendered.contains("Questions"));
        assert!(rendered.contains("38.5%"));
    }

    #[test]
    fn insights_list_topics() {
        let rendered = render(&Output::Insights(topic_insights(&default_tree())));
        assert!(rendered.contains("Stack"));
        assert!(rendered.contains("Sliding Window"));
    }

    #[test]
    fn outcomes_read_plainly() {
        let applied = Output::Outcome {
            action: "toggle",
            outcome: CommandOutcome::Applied,
        };
        let unchanged = Output::Outcome {
            action: "delete-topic",
            outcome: CommandOutcome::Unchanged,
        };
        assert_eq!(render(&applied), "toggle: done");
        assert_eq!(render(&unchanged), "delete-topic: nothing changed");
    }
}
