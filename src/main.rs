fn main() -> anyhow::Result<()> {
    glean::cli::run()?;
    Ok(())
}
