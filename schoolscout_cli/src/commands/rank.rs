use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use schoolscout_lib::{search_from_list, CachedClient, Transformer};

use crate::output::{load_ranking_list, print_schools, save_csv, CsvLayout, US_NEWS_LINK};

#[derive(Args)]
pub struct RankArgs {
    /// CSV with "Name" and "US N&W ID" columns
    #[arg(long, default_value = "school_list.csv")]
    pub list: PathBuf,

    /// Output CSV file
    #[arg(long, default_value = "ranking.csv")]
    pub out: PathBuf,

    /// Keep the Website column instead of linking school names
    #[arg(long)]
    pub plain_names: bool,

    /// Also list the results on stdout
    #[arg(long)]
    pub print: bool,
}

pub async fn run(args: &RankArgs, client: &CachedClient) -> Result<()> {
    let entries = load_ranking_list(&args.list)?;
    let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
    tracing::info!("Looking up {} ranked schools", names.len());

    let transformer = Transformer::default();
    let mut records = search_from_list(client, &names, &transformer).await?;
    for (record, entry) in records.iter_mut().zip(&entries) {
        record.set(US_NEWS_LINK, Some(entry.us_news_link()));
    }

    if args.print {
        print_schools(&records);
    }

    let layout = CsvLayout::new(transformer.mapping(), &[US_NEWS_LINK], !args.plain_names);
    save_csv(&args.out, &layout, &records)?;
    eprintln!("Wrote {} schools to {}", records.len(), args.out.display());
    Ok(())
}
