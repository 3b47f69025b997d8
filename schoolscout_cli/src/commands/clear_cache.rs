use anyhow::Result;
use schoolscout_lib::DiskCache;

pub fn run(cache: &DiskCache) -> Result<()> {
    let removed = cache.clear()?;
    eprintln!(
        "Removed {} cached queries from {}",
        removed,
        cache.dir().display()
    );
    Ok(())
}
