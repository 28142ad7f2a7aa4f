//! Generation plan resolution.
//!
//! Given a panel set and a request for one panel, decide the exact prompt
//! text, the image size, and whether to generate from scratch or edit a
//! reference image (the previous panel's render). No I/O happens here.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use storyboard_core::error::DomainError;
use storyboard_core::panel::{PANEL_COUNT, Panel, PanelSet};
use tracing::warn;

/// Image size used when the caller does not pick one.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1536";

/// Prefix of the note that carries the previous panel's prompt forward.
pub const CONSISTENCY_NOTE_PREFIX: &str = "Consistency note based on previous panel: ";

/// Prompt sent when background and panel prompt are both empty.
pub const FALLBACK_PROMPT: &str = "Placeholder prompt";

/// How the image capability is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Prompt only.
    Generate,
    /// Prompt plus reference image.
    Edit,
}

impl GenerationMode {
    /// Lowercase name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Edit => "edit",
        }
    }
}

/// A request to render one panel.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// 1-based position into the panels sorted by number and truncated to
    /// eight. Not the panel's own number.
    pub panel_index: i64,
    /// Requested image size, e.g. `1024x1024`.
    pub size: Option<String>,
    /// Whether to chain the previous panel's prompt and image.
    pub use_image_references: bool,
    /// Base64 of the previous panel's image, optionally as a data URL.
    pub previous_image: Option<String>,
}

/// Everything needed to call the image capability for one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Generate or edit.
    pub mode: GenerationMode,
    /// Final prompt text.
    pub prompt: String,
    /// Image size.
    pub size: String,
    /// Decoded reference image; present only in edit mode.
    pub reference: Option<Vec<u8>>,
    /// The panel being rendered.
    pub target: Panel,
    /// 1-based position of the target among the considered panels.
    pub position: usize,
    /// Number of panels considered after truncation.
    pub total_panels: usize,
}

/// Resolves the generation plan for the requested panel.
///
/// # Errors
///
/// Returns `DomainError::NoPanelsFound` for an empty set,
/// `DomainError::InvalidPanelIndex` for an index below 1,
/// `DomainError::PanelIndexOutOfRange` for an index past the last panel, and
/// `DomainError::InvalidReferenceImage` if the previous image is not valid
/// base64.
pub fn resolve_generation_plan(
    panel_set: &PanelSet,
    request: &GenerationRequest,
) -> Result<GenerationPlan, DomainError> {
    let mut panels = panel_set.sorted_panels();
    if panels.len() > PANEL_COUNT {
        warn!(
            received = panels.len(),
            kept = PANEL_COUNT,
            "dropping panels beyond the limit"
        );
        panels.truncate(PANEL_COUNT);
    }

    if panels.is_empty() {
        return Err(DomainError::NoPanelsFound);
    }
    if request.panel_index < 1 {
        return Err(DomainError::InvalidPanelIndex(request.panel_index));
    }

    let total_panels = panels.len();
    let position = usize::try_from(request.panel_index - 1)
        .ok()
        .filter(|position| *position < total_panels)
        .ok_or(DomainError::PanelIndexOutOfRange {
            index: request.panel_index,
            total: total_panels,
        })?;

    let target = panels[position];
    let previous = position
        .checked_sub(1)
        .map(|p| panels[p])
        .filter(|_| request.use_image_references);

    let prompt = build_prompt(&panel_set.background, target, previous);

    let reference = if request.use_image_references {
        request
            .previous_image
            .as_deref()
            .filter(|encoded| !encoded.trim().is_empty())
            .map(decode_reference)
            .transpose()?
    } else {
        None
    };
    let mode = if reference.is_some() {
        GenerationMode::Edit
    } else {
        GenerationMode::Generate
    };

    let size = request
        .size
        .as_deref()
        .map(str::trim)
        .filter(|size| !size.is_empty())
        .unwrap_or(DEFAULT_IMAGE_SIZE)
        .to_owned();

    Ok(GenerationPlan {
        mode,
        prompt,
        size,
        reference,
        target: target.clone(),
        position: position + 1,
        total_panels,
    })
}

fn build_prompt(background: &str, target: &Panel, previous: Option<&Panel>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);

    let background = background.trim();
    if !background.is_empty() {
        parts.push(background.to_owned());
    }
    parts.push(target.prompt.trim().to_owned());
    if let Some(previous) = previous {
        parts.push(format!(
            "{CONSISTENCY_NOTE_PREFIX}{}",
            previous.prompt.trim()
        ));
    }

    let prompt = parts.join("\n\n");
    if prompt.is_empty() {
        FALLBACK_PROMPT.to_owned()
    } else {
        prompt
    }
}

/// Decodes base64 image data, ignoring any data-URL prefix before the last
/// comma.
fn decode_reference(encoded: &str) -> Result<Vec<u8>, DomainError> {
    let payload: String = encoded
        .rsplit(',')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| DomainError::InvalidReferenceImage(e.to_string()))?;
    if bytes.is_empty() {
        return Err(DomainError::InvalidReferenceImage(
            "reference image is empty".into(),
        ));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(background: &str, prompts: &[(i64, &str)]) -> PanelSet {
        PanelSet::new(
            background,
            prompts
                .iter()
                .map(|(n, prompt)| Panel::new(*n, "", *prompt))
                .collect(),
        )
    }

    fn request(panel_index: i64) -> GenerationRequest {
        GenerationRequest {
            panel_index,
            ..GenerationRequest::default()
        }
    }

    #[test]
    fn test_background_and_prompt_without_chaining() {
        // Arrange
        let set = set_of("A city at dusk.", &[(1, "A hero stands.")]);

        // Act
        let plan = resolve_generation_plan(&set, &request(1)).unwrap();

        // Assert
        assert_eq!(plan.prompt, "A city at dusk.\n\nA hero stands.");
        assert_eq!(plan.mode, GenerationMode::Generate);
        assert_eq!(plan.size, DEFAULT_IMAGE_SIZE);
        assert_eq!(plan.reference, None);
        assert_eq!(plan.position, 1);
        assert_eq!(plan.total_panels, 1);
    }

    #[test]
    fn test_rejects_empty_panel_set() {
        let result = resolve_generation_plan(&set_of("bg", &[]), &request(1));
        assert!(matches!(result, Err(DomainError::NoPanelsFound)));
    }

    #[test]
    fn test_rejects_zero_and_negative_index() {
        let set = set_of("", &[(1, "a")]);
        for index in [0, -3] {
            let result = resolve_generation_plan(&set, &request(index));
            assert!(
                matches!(result, Err(DomainError::InvalidPanelIndex(i)) if i == index),
                "index {index}"
            );
        }
    }

    #[test]
    fn test_rejects_index_past_truncated_count() {
        let prompts: Vec<(i64, &str)> = (1..=10).map(|n| (n, "p")).collect();
        let set = set_of("", &prompts);

        let result = resolve_generation_plan(&set, &request(9));

        assert!(matches!(
            result,
            Err(DomainError::PanelIndexOutOfRange { index: 9, total: 8 })
        ));
    }

    #[test]
    fn test_truncates_to_first_eight_by_number() {
        // Arrange: panels out of order, ten of them.
        let prompts: Vec<(i64, String)> = [10, 3, 9, 1, 8, 2, 7, 4, 6, 5]
            .iter()
            .map(|n| (*n, format!("prompt {n}")))
            .collect();
        let set = PanelSet::new(
            "",
            prompts
                .iter()
                .map(|(n, p)| Panel::new(*n, "", p.as_str()))
                .collect(),
        );

        // Act
        let last = resolve_generation_plan(&set, &request(8)).unwrap();
        let first = resolve_generation_plan(&set, &request(1)).unwrap();

        // Assert
        assert_eq!(last.target.n, 8);
        assert_eq!(last.total_panels, 8);
        assert_eq!(first.target.n, 1);
    }

    #[test]
    fn test_index_is_position_not_panel_number() {
        let set = set_of("", &[(5, "five"), (2, "two"), (9, "nine")]);
        let plan = resolve_generation_plan(&set, &request(2)).unwrap();
        assert_eq!(plan.target.n, 5);
        assert_eq!(plan.prompt, "five");
    }

    #[test]
    fn test_chaining_adds_consistency_note() {
        let set = set_of(" Noir. ", &[(1, " Rain falls. "), (2, "A door opens.")]);
        let plan = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 2,
                use_image_references: true,
                ..GenerationRequest::default()
            },
        )
        .unwrap();

        assert_eq!(
            plan.prompt,
            "Noir.\n\nA door opens.\n\nConsistency note based on previous panel: Rain falls."
        );
        assert_eq!(plan.mode, GenerationMode::Generate);
    }

    #[test]
    fn test_chaining_on_first_panel_has_no_note() {
        let set = set_of("", &[(1, "Rain falls."), (2, "A door opens.")]);
        let plan = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 1,
                use_image_references: true,
                ..GenerationRequest::default()
            },
        )
        .unwrap();
        assert_eq!(plan.prompt, "Rain falls.");
    }

    #[test]
    fn test_empty_texts_fall_back_to_placeholder_prompt() {
        let set = set_of("  ", &[(1, "")]);
        let plan = resolve_generation_plan(&set, &request(1)).unwrap();
        assert_eq!(plan.prompt, FALLBACK_PROMPT);
    }

    #[test]
    fn test_empty_target_prompt_keeps_its_slot() {
        let set = set_of("A city at dusk.", &[(1, "Rain falls."), (2, "  ")]);
        let plan = resolve_generation_plan(
            &set,
            &GenerationRequest {
                use_image_references: true,
                ..request(2)
            },
        )
        .unwrap();
        assert_eq!(
            plan.prompt,
            "A city at dusk.\n\n\n\nConsistency note based on previous panel: Rain falls."
        );
    }

    #[test]
    fn test_edit_mode_requires_chaining_and_previous_image() {
        let set = set_of("", &[(1, "a"), (2, "b")]);
        let image = STANDARD.encode(b"png-bytes");

        let with_both = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 2,
                use_image_references: true,
                previous_image: Some(image.clone()),
                ..GenerationRequest::default()
            },
        )
        .unwrap();
        assert_eq!(with_both.mode, GenerationMode::Edit);
        assert_eq!(with_both.reference.as_deref(), Some(&b"png-bytes"[..]));

        let chaining_off = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 2,
                use_image_references: false,
                previous_image: Some(image),
                ..GenerationRequest::default()
            },
        )
        .unwrap();
        assert_eq!(chaining_off.mode, GenerationMode::Generate);
        assert_eq!(chaining_off.reference, None);

        let no_image = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 2,
                use_image_references: true,
                previous_image: None,
                ..GenerationRequest::default()
            },
        )
        .unwrap();
        assert_eq!(no_image.mode, GenerationMode::Generate);
    }

    #[test]
    fn test_reference_tolerates_data_url_prefix() {
        let set = set_of("", &[(1, "a"), (2, "b")]);
        let encoded = format!("data:image/png;base64,{}", STANDARD.encode(b"abc"));
        let plan = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 2,
                use_image_references: true,
                previous_image: Some(encoded),
                ..GenerationRequest::default()
            },
        )
        .unwrap();
        assert_eq!(plan.reference, Some(b"abc".to_vec()));
    }

    #[test]
    fn test_invalid_reference_is_rejected() {
        let set = set_of("", &[(1, "a"), (2, "b")]);
        let result = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 2,
                use_image_references: true,
                previous_image: Some("not base64 at all!".into()),
                ..GenerationRequest::default()
            },
        );
        assert!(matches!(result, Err(DomainError::InvalidReferenceImage(_))));
    }

    #[test]
    fn test_custom_size_is_kept() {
        let set = set_of("", &[(1, "a")]);
        let plan = resolve_generation_plan(
            &set,
            &GenerationRequest {
                panel_index: 1,
                size: Some("1024x1024".into()),
                ..GenerationRequest::default()
            },
        )
        .unwrap();
        assert_eq!(plan.size, "1024x1024");
    }
}
