use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use schoolscout_lib::school::fields;
use schoolscout_lib::{
    general_search, school_query, CachedClient, FilterEngine, ProjectionMode, Settings,
    Transformer,
};

use crate::output::{print_json, print_schools, save_csv, CsvLayout};

#[derive(Args)]
pub struct SearchArgs {
    /// Minimum 6-year median earnings (overrides settings)
    #[arg(long)]
    pub salary_cutoff: Option<f64>,

    /// Minimum average SAT score (overrides settings)
    #[arg(long)]
    pub sat_cutoff: Option<f64>,

    /// Minimum undergraduate enrollment
    #[arg(long, default_value = "500")]
    pub min_size: u32,

    /// Restrict to a US state code (e.g. PA, CA)
    #[arg(long)]
    pub state: Option<String>,

    /// Keep online-only schools
    #[arg(long)]
    pub include_online: bool,

    /// Keep branch campuses
    #[arg(long)]
    pub include_branches: bool,

    /// Output CSV file
    #[arg(long, default_value = "general.csv")]
    pub out: PathBuf,

    /// Keep the Website column instead of linking school names
    #[arg(long)]
    pub plain_names: bool,

    /// Emit a null column for every mapped field the API omitted
    #[arg(long)]
    pub fill_missing: bool,

    /// Also list the results on stdout
    #[arg(long)]
    pub print: bool,

    /// List the results on stdout as JSON
    #[arg(long, conflicts_with = "print")]
    pub json: bool,
}

pub async fn run(args: &SearchArgs, client: &CachedClient, settings: &Settings) -> Result<()> {
    let mut filters = vec![
        (fields::OPERATING.to_string(), "1".to_string()),
        (fields::STUDENT_SIZE_RANGE.to_string(), format!("{}..", args.min_size)),
    ];
    if let Some(state) = &args.state {
        filters.push((fields::STATE.to_string(), state.trim().to_uppercase()));
    }
    let query = school_query(filters);

    let mut config = settings.filter_config();
    if let Some(cutoff) = args.salary_cutoff {
        config.salary_cutoff = cutoff;
    }
    if let Some(cutoff) = args.sat_cutoff {
        config.sat_cutoff = cutoff;
    }
    if args.include_online {
        config.exclude_online_only = false;
    }
    if args.include_branches {
        config.require_main_campus = false;
    }

    let mode = if args.fill_missing {
        ProjectionMode::NullPlaceholder
    } else {
        ProjectionMode::Permissive
    };
    let transformer = Transformer::new(Default::default(), mode);

    let records =
        general_search(client, &query, &FilterEngine::new(config), &transformer).await?;

    if args.json {
        print_json(&records);
    } else if args.print {
        print_schools(&records);
    }

    let layout = CsvLayout::new(transformer.mapping(), &[], !args.plain_names);
    save_csv(&args.out, &layout, &records)?;
    eprintln!("Wrote {} schools to {}", records.len(), args.out.display());
    Ok(())
}
