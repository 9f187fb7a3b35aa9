//! Subcommand implementations.

use anyhow::Result;
use comfy_table::Table;

use fisheries_core::{CleanerOptions, PipelineOrchestrator, PipelineReport};
use fisheries_model::{RegionDimension, SchemaContract};

use crate::cli::CleanArgs;
use crate::report::apply_table_style;

/// Runs the full two-dataset cleaning pipeline.
pub fn run_clean(args: &CleanArgs) -> Result<PipelineReport> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.join("cleaned"));
    let options = CleanerOptions {
        remove_aggregates: !args.keep_aggregates,
        remove_display: args.remove_display,
    };
    PipelineOrchestrator::new(&args.input_dir, output_dir)
        .with_options(options)
        .run()
}

/// Prints both schema contracts.
pub fn run_contracts() {
    let mut table = Table::new();
    table.set_header(vec![
        "Dataset",
        "Years",
        "Region",
        "Required Columns",
        "Species Groups",
        "Ecosystem Types",
    ]);
    apply_table_style(&mut table);

    for contract in [SchemaContract::commercial(), SchemaContract::non_commercial()] {
        let region = match &contract.region {
            RegionDimension::AreaId => "area_id (identifier)".to_string(),
            RegionDimension::Island { expected } => {
                format!("island ({})", expected.join(", "))
            }
        };
        table.add_row(vec![
            contract.kind.display_name().to_string(),
            format!("{}-{}", contract.valid_years.min, contract.valid_years.max),
            region,
            contract.required_columns.join("\n"),
            contract.expected_species_groups.join("\n"),
            contract.expected_ecosystem_types.join("\n"),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(keep_aggregates: bool, remove_display: bool) -> CleanArgs {
        CleanArgs {
            input_dir: PathBuf::from("data/raw"),
            output_dir: None,
            keep_aggregates,
            remove_display,
        }
    }

    #[test]
    fn flags_map_onto_cleaner_options() {
        let defaults = args(false, false);
        let options = CleanerOptions {
            remove_aggregates: !defaults.keep_aggregates,
            remove_display: defaults.remove_display,
        };
        assert_eq!(options, CleanerOptions::default());

        let flipped = args(true, true);
        let options = CleanerOptions {
            remove_aggregates: !flipped.keep_aggregates,
            remove_display: flipped.remove_display,
        };
        assert!(!options.remove_aggregates);
        assert!(options.remove_display);
    }
}
