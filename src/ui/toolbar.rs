use dioxus::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::state::address::Address;
use crate::state::editor::GridEditor;
use crate::state::grid::Table;
use crate::ui::actions;

/// Column the structural controls act on: the active selection's column,
/// falling back to column 0.
fn target_column(editor: &GridEditor) -> usize {
    match editor.selection.active {
        Address::Cell { col, .. }
        | Address::Ghost { col }
        | Address::Header { col }
        | Address::ColSelector { col } => col,
        _ => 0,
    }
}

/// Row the structural controls act on, if the selection names one.
fn target_row(editor: &GridEditor) -> Option<usize> {
    match editor.selection.active {
        Address::Cell { row, .. } | Address::RowSelector { row } => Some(row),
        _ => None,
    }
}

#[component]
pub fn Toolbar(
    editor: Signal<GridEditor>,
    host_table: Signal<Table>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
) -> Element {
    let mut editor = editor;
    let mut save_success = use_signal(|| false);
    let mut filter_values = use_signal(String::new);
    let mut width_value = use_signal(String::new);

    let description = editor
        .read()
        .table()
        .metadata
        .description
        .clone()
        .unwrap_or_default();
    let selected_rows = editor.read().selection.selected_row_span();

    rsx! {
        div { class: "toolbar",
            // File group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-open",
                    onclick: move |_| {
                        spawn(async move {
                            actions::open_file(editor, host_table, file_path, error_message).await;
                        });
                    },
                    "\u{1F4C2} Open"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-save",
                    disabled: file_path.read().is_none(),
                    onclick: move |_| {
                        let success = actions::save_file(host_table, file_path, error_message);
                        if success {
                            save_success.set(true);
                            spawn(async move {
                                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                                save_success.set(false);
                            });
                        }
                    },
                    "\u{1F4BE} Save"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-save-as",
                    onclick: move |_| {
                        spawn(async move {
                            actions::save_file_as(host_table, file_path, error_message).await;
                        });
                    },
                    "Save As"
                }
                if *save_success.read() {
                    span { class: "save-success", "\u{2714} Saved" }
                }
            }
            div { class: "toolbar-separator" }

            // Row group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-insert-row",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let at = target_row(e).unwrap_or(e.table().rows.len());
                            e.insert_row_at(at);
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "\u{2795} Row"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-delete-rows",
                    disabled: selected_rows.is_none() && target_row(&editor.read()).is_none(),
                    onclick: move |_| {
                        let rows = {
                            let read = editor.read();
                            match read.selection.selected_row_span() {
                                Some((start, end)) => (start..=end).collect::<Vec<_>>(),
                                None => target_row(&read).into_iter().collect(),
                            }
                        };
                        if !rows.is_empty() {
                            editor.with_mut(|e| e.delete_rows(rows));
                            actions::flush_events(editor, host_table);
                        }
                    },
                    "\u{1F5D1} Rows"
                }
            }
            div { class: "toolbar-separator" }

            // Column group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-insert-column",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let at = target_column(e);
                            e.insert_column_at(at);
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "\u{2795} Column"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-clear-column",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let col = target_column(e);
                            e.clear_columns(vec![col]);
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "\u{2715} Clear Col"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-delete-column",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let col = target_column(e);
                            e.delete_column_at(col);
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "\u{1F5D1} Column"
                }
                span { class: "toolbar-label", id: "label-width", "Width" }
                input {
                    class: "toolbar-input toolbar-input-sm",
                    id: "input-column-width",
                    r#type: "number",
                    min: "24",
                    placeholder: "px",
                    value: "{width_value.read()}",
                    oninput: move |evt| {
                        width_value.set(evt.value());
                    },
                    onchange: move |evt| {
                        if let Ok(width) = evt.value().parse::<f64>() {
                            editor.with_mut(|e| {
                                let col = target_column(e);
                                e.resize_column(col, width);
                            });
                            actions::flush_events(editor, host_table);
                        }
                    }
                }
            }
            div { class: "toolbar-separator" }

            // Sort group (acts on the active column)
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-sort-asc",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let col = target_column(e);
                            e.set_sort(col, "asc");
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "A\u{2192}Z"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-sort-desc",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let col = target_column(e);
                            e.set_sort(col, "desc");
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "Z\u{2192}A"
                }
            }
            div { class: "toolbar-separator" }

            // Filter group: comma-separated values to hide in the active column
            div { class: "toolbar-group",
                input {
                    class: "toolbar-input",
                    id: "input-filter-values",
                    placeholder: "Hide values (a, b, c)",
                    value: "{filter_values.read()}",
                    oninput: move |evt| {
                        filter_values.set(evt.value());
                    }
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-apply-filter",
                    onclick: move |_| {
                        let hidden: BTreeSet<String> = filter_values
                            .read()
                            .split(',')
                            .map(|v| v.trim().to_string())
                            .filter(|v| !v.is_empty())
                            .collect();
                        editor.with_mut(|e| {
                            let col = target_column(e);
                            e.set_filter(col, hidden);
                        });
                        actions::flush_events(editor, host_table);
                    },
                    "Filter"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-clear-filter",
                    onclick: move |_| {
                        editor.with_mut(|e| {
                            let col = target_column(e);
                            e.set_filter(col, BTreeSet::new());
                        });
                        filter_values.set(String::new());
                        actions::flush_events(editor, host_table);
                    },
                    "\u{2715} Filter"
                }
            }
            div { class: "toolbar-separator" }

            // Description
            div { class: "toolbar-group",
                input {
                    class: "toolbar-input toolbar-input-wide",
                    id: "input-description",
                    placeholder: "Table description",
                    value: "{description}",
                    onchange: move |evt| {
                        editor.with_mut(|e| e.commit_description(evt.value()));
                        actions::flush_events(editor, host_table);
                    }
                }
            }

            // Info area (right-aligned)
            div { class: "toolbar-info",
                if let Some(path) = file_path.read().as_ref() {
                    span { class: "file-path", "{path.display()}" }
                }
                if let Some(err) = error_message.read().as_ref() {
                    span { class: "error-message", "{err}" }
                }
            }
        }
    }
}
