//! Command handlers for the Illustration context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: parse the block, resolve the plan, call the
//! image provider.

use storyboard_core::block::parse_block;
use storyboard_core::command::Command;
use storyboard_core::error::DomainError;
use storyboard_core::provider::ImageProvider;
use tracing::{info, instrument};

use crate::domain::commands::GeneratePanel;
use crate::domain::filename::panel_filename;
use crate::domain::plan::{GenerationMode, resolve_generation_plan};

/// A rendered panel.
#[derive(Debug)]
pub struct GeneratedPanel {
    /// Suggested download filename.
    pub filename: String,
    /// Raw image bytes.
    pub image: Vec<u8>,
    /// Number of the rendered panel as declared in the block.
    pub panel_number: i64,
    /// 1-based position among the considered panels.
    pub position: usize,
    /// Number of panels considered.
    pub total_panels: usize,
    /// Image size requested upstream.
    pub size: String,
    /// Whether a reference image was used.
    pub mode: GenerationMode,
}

/// Handles the `GeneratePanel` command: parses the block, resolves the
/// generation plan and renders the target panel.
///
/// # Errors
///
/// Returns the plan resolution errors (`NoPanelsFound`, `InvalidPanelIndex`,
/// `PanelIndexOutOfRange`, `InvalidReferenceImage`), any error the image
/// provider reports, or `DomainError::InvalidUpstreamOutput` when the
/// provider returns no bytes.
#[instrument(
    skip(command, images),
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id,
        panel_index = command.request.panel_index,
    )
)]
pub async fn handle_generate_panel(
    command: &GeneratePanel,
    images: &dyn ImageProvider,
) -> Result<GeneratedPanel, DomainError> {
    let panel_set = parse_block(&command.block);
    let plan = resolve_generation_plan(&panel_set, &command.request)?;

    info!(
        mode = plan.mode.as_str(),
        panel_number = plan.target.n,
        position = plan.position,
        total_panels = plan.total_panels,
        size = %plan.size,
        prompt_length = plan.prompt.len(),
        "rendering panel"
    );

    let image = match (plan.mode, plan.reference.as_deref()) {
        (GenerationMode::Edit, Some(reference)) => {
            images.edit(&plan.prompt, &plan.size, reference).await?
        }
        _ => images.generate(&plan.prompt, &plan.size).await?,
    };

    if image.is_empty() {
        return Err(DomainError::InvalidUpstreamOutput(
            "image provider returned no data".into(),
        ));
    }

    Ok(GeneratedPanel {
        filename: panel_filename(&plan.target),
        image,
        panel_number: plan.target.n,
        position: plan.position,
        total_panels: plan.total_panels,
        size: plan.size,
        mode: plan.mode,
    })
}
