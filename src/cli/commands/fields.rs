//! `trt fields` command - list the field catalog

use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::catalog::{FieldKind, CATALOG};

#[derive(clap::Args, Debug)]
pub struct FieldsArgs {}

pub fn run(_args: FieldsArgs) -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Label", "Kind", "Required", "Description"]);
    for def in CATALOG {
        let kind = match def.field.kind() {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Status => "status",
            FieldKind::Resolution => "resolution",
        };
        builder.push_record([
            def.field.to_string(),
            def.label.to_string(),
            kind.to_string(),
            if def.required { "yes" } else { "" }.to_string(),
            def.description.to_string(),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));
    println!("{} field(s)", CATALOG.len());
    Ok(())
}
