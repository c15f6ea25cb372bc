pub mod dom_text;
pub mod tsv;
