//! Generate marketing copy for a product brief.

use clap::Args;

use eqori_client::EqoriClient;
use eqori_core::ProductBrief;

use crate::commands::CommandError;
use crate::screen;

/// Product brief, one flag per form field.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Product name
    #[arg(long = "name")]
    pub product_name: String,

    /// Product category (e.g. "Fitness", "Home Office")
    #[arg(long)]
    pub category: Option<String>,

    /// Key features, free text
    #[arg(long)]
    pub features: Option<String>,

    /// Target audience
    #[arg(long = "audience")]
    pub target_audience: Option<String>,

    /// Tone of voice for the copy
    #[arg(long = "tone")]
    pub tone_of_voice: Option<String>,

    /// SEO keywords to weave in
    #[arg(long = "keywords")]
    pub seo_keywords: Option<String>,
}

impl From<&GenerateArgs> for ProductBrief {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            product_name: args.product_name.clone(),
            category: args.category.clone(),
            features: args.features.clone(),
            target_audience: args.target_audience.clone(),
            tone_of_voice: args.tone_of_voice.clone(),
            seo_keywords: args.seo_keywords.clone(),
        }
    }
}

/// Submit the brief and render the generated copy.
pub async fn run(client: &EqoriClient, args: &GenerateArgs) -> Result<(), CommandError> {
    let state = screen::resolve_session(client).await;
    screen::gate_authenticated(&state)?;

    println!("Generating marketing copy for \"{}\"...", args.product_name);
    let record = client.generation().generate(&ProductBrief::from(args)).await?;
    println!();
    screen::print_record(&record);
    Ok(())
}
