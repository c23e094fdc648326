use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{debug, info, info_span};

use rowschema_compile::compile_schema;
use rowschema_ingest::{CsvOptions, read_csv_records_with_options};
use rowschema_model::{DatasetDefinition, Field};

use crate::cli::{DescribeArgs, ValidateArgs};
use crate::logging::redact_value;
use crate::types::ValidationRun;

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationRun> {
    let span = info_span!("validate", input = %args.input.display());
    let _guard = span.enter();

    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }
    let dataset = DatasetDefinition::load(&args.dataset)
        .with_context(|| format!("load dataset definition {}", args.dataset.display()))?;
    let validator = compile_schema(&dataset)
        .with_context(|| format!("compile dataset '{}'", dataset.name))?;

    let start = Instant::now();
    let options = CsvOptions::default().with_delimiter(args.delimiter as u8);
    let table = read_csv_records_with_options(&args.input, options)
        .with_context(|| format!("read {}", args.input.display()))?;

    let mut writer = match &args.output {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => None,
    };

    let mut run = ValidationRun::new(
        dataset.name.clone(),
        args.input.clone(),
        validator.output_keys().map(str::to_string).collect(),
        args.max_errors,
    );
    run.output.clone_from(&args.output);

    for (index, raw) in table.records.iter().enumerate() {
        let record_number = index + 1;
        match validator.validate(raw) {
            Ok(record) => {
                if let Some(writer) = writer.as_mut() {
                    serde_json::to_writer(&mut *writer, &record).context("write record")?;
                    writer.write_all(b"\n").context("write record")?;
                }
                run.record_success();
            }
            Err(errors) => {
                for error in &errors {
                    debug!(
                        record = record_number,
                        field = %error.field,
                        kind = %error.kind,
                        message = %redact_value(&error.message),
                        "field rejected"
                    );
                }
                run.record_failure(record_number, errors);
            }
        }
    }
    if let Some(mut writer) = writer {
        writer.flush().context("flush output")?;
    }

    info!(
        dataset = %run.dataset,
        records = run.records,
        valid = run.valid,
        invalid = run.invalid,
        duration_ms = start.elapsed().as_millis(),
        "validation complete"
    );
    Ok(run)
}

pub fn run_describe(args: &DescribeArgs) -> Result<()> {
    let dataset = DatasetDefinition::load(&args.dataset)
        .with_context(|| format!("load dataset definition {}", args.dataset.display()))?;
    compile_schema(&dataset).with_context(|| format!("compile dataset '{}'", dataset.name))?;
    println!("Dataset: {} ({} fields)", dataset.name, dataset.fields.len());
    println!("{}", describe_table(&dataset));
    Ok(())
}

/// Field listing for a dataset definition.
pub fn describe_table(dataset: &DatasetDefinition) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Raw name",
        "Output key",
        "Type",
        "Sentinels",
        "Default",
        "Shown",
        "Description",
    ]);
    crate::summary::apply_table_style(&mut table);
    for field in &dataset.fields {
        table.add_row(vec![
            field.raw_name.clone(),
            field.output_key().to_string(),
            field.field_type.describe(),
            sentinel_list(field),
            field.default_value.clone().unwrap_or_else(|| "-".to_string()),
            if field.should_display { "yes" } else { "no" }.to_string(),
            field.description.clone(),
        ]);
    }
    table
}

fn sentinel_list(field: &Field) -> String {
    if field.additional_mappings.is_empty() {
        return "-".to_string();
    }
    field
        .additional_mappings
        .iter()
        .map(|mapping| format!("{} -> {}", mapping.from_value, mapping.mapped_to))
        .collect::<Vec<_>>()
        .join(", ")
}
