use anyhow::{Context, Result, bail};
use clap::Parser;

use pdfmerge::cli::Cli;
use pdfmerge::io::{output_path, read_inputs, sanitize_file_name};
use pdfmerge::logging::init_logging;
use pdfmerge::merge::PdfMerger;
use pdfmerge::naming::SmartNamer;
use pdfmerge::session::{MergeOutcome, MergeSession};
use pdfmerge::utils::collect_paths_for_patterns;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("failed to initialise logging")?;

    let config = cli.to_config().map_err(anyhow::Error::msg)?;

    let paths = collect_paths_for_patterns(&cli.inputs)?;
    if paths.is_empty() {
        bail!("No PDF files matched the given inputs");
    }

    let files = read_inputs(&paths).await?;
    let mut session = MergeSession::with_config(&config);
    session.add_files(files);

    println!(
        "Merging {} PDF files ({})...",
        session.len(),
        session.format_total_size()
    );

    if let Some(name) = &cli.output {
        output_path(&cli.dir, name)?;
        session.set_output_name(name.clone());
    } else if cli.smart_name {
        let namer = SmartNamer::new(&config.naming);
        session.request_smart_name(&namer).await;
        if let Some(reason) = session.naming_outcome().error() {
            println!("  Could not generate a name ({reason}), using the date instead");
        }

        // Model output may contain path separators.
        let suggested = session.output_name().to_string();
        let usable = sanitize_file_name(&suggested)
            .unwrap_or_else(|| config.default_output_name.clone());
        if usable != suggested {
            println!("  Saving as {usable} instead of {suggested:?}");
            session.set_output_name(usable);
        }
    }

    let merger = PdfMerger::with_options(config.merge.clone());
    session.request_merge(&merger).await;

    match session.merge_outcome() {
        MergeOutcome::Ready { output, report } => {
            let stats = output
                .save_to_dir(&cli.dir, session.output_name())
                .await?;
            println!(
                "✓ Created {} ({} pages, {})",
                stats.output_path.display(),
                report.total_pages,
                report.format_output_size()
            );
            Ok(())
        }
        MergeOutcome::Failed { message } => bail!("{message}"),
        MergeOutcome::Idle | MergeOutcome::Merging { .. } => bail!("Merge did not complete"),
    }
}
