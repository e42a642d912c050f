//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::fmt::Display;
use std::path::Path;
use threatlens_domain::CompletionClient;
use threatlens_extractor::{ExtractionReport, Extractor, ExtractorConfig};
use threatlens_llm::OpenAiClient;

/// Execute the extract command against the configured completion service.
pub fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<ExtractionReport> {
    let mut completion = config.completion.clone().with_api_key_from_env();
    if let Some(model) = args.model {
        completion.model = model;
    }
    let client = OpenAiClient::new(completion)?;
    let model = client.model().to_string();

    let output = args.output.unwrap_or_else(|| config.paths.table.clone());
    let report = extract_with(client, &model, &args.input, &output, &config.extractor)?;

    println!("{}", formatter.extraction_summary(&report, &output));
    Ok(report)
}

/// Run an extraction with any completion client.
pub fn extract_with<C>(
    client: C,
    model: &str,
    input: &Path,
    output: &Path,
    config: &ExtractorConfig,
) -> Result<ExtractionReport>
where
    C: CompletionClient,
    C::Error: Display,
{
    let extractor = Extractor::new(client, config.tokenizer.build(model)?, config.clone())?
        .with_model_name(model);
    Ok(extractor.extract_file(input, output)?)
}
