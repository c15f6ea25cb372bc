use dioxus::prelude::*;
use std::path::PathBuf;

use crate::io::table_io;
use crate::state::editor::GridEditor;
use crate::state::grid::Table;
use crate::ui::table::Grid;
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

fn starter_table() -> Table {
    Table::new(
        vec!["Column A".into(), "Column B".into(), "Column C".into()],
        vec![vec![String::new(); 3]; 3],
    )
}

#[component]
pub fn App() -> Element {
    let editor = use_signal(|| GridEditor::with_table(starter_table()));
    let host_table = use_signal(starter_table);
    let file_path = use_signal::<Option<PathBuf>>(|| None);
    let error_message = use_signal::<Option<String>>(|| None);

    use_effect({
        let mut editor = editor;
        let mut host_table = host_table;
        let mut file_path = file_path;
        let mut error_message = error_message;
        move || {
            if let Ok(path) = std::env::var("MDSHEET_OPEN") {
                let path = PathBuf::from(path);
                match table_io::load_table(&path) {
                    Ok(table) => {
                        host_table.set(table.clone());
                        editor.with_mut(|e| e.replace_table(table));
                        file_path.set(Some(path));
                        error_message.set(None);
                    }
                    Err(e) => {
                        error_message.set(Some(e.to_string()));
                    }
                }
            }
        }
    });

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app",
            Toolbar { editor, host_table, file_path, error_message }
            Grid { editor, host_table }
        }
    }
}
