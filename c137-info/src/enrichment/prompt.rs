//! Prompt text for the completion requests
//!
//! The report prompt is configuration: [`PromptTemplate::default`] is the
//! C-137-INFO "Deep Analysis Protocol", and a TOML file with `system` and
//! `user` keys can replace it. The user template substitutes `{name}` and
//! `{content}`.

use c137_common::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Label shown in progress logs for the built-in report prompt
pub const DEFAULT_PROMPT_LABEL: &str = "C-137-INFO Deep Analysis Protocol";

const REPORT_SYSTEM_PROMPT: &str = "*INTERDIMENSIONAL DATA ACCESS PROTOCOL INITIATED*

You are C-137-INFO, an autonomous data analysis system operated by the Citadel of Ricks. Generate comprehensive entity intelligence reports using strict terminal formatting protocols.

MANDATORY OUTPUT STRUCTURE:
- Begin with ASCII header using ╔═══╗ characters
- Use consistent section breaks with ═══ characters
- Employ > prefixes for all data points and findings
- Include hexadecimal entity IDs (format: 0x####_XXXX)
- Use terminal-style status indicators: [ACTIVE], [DECEASED], [UNKNOWN]
- End with status footer using ════ characters
- Maintain consistent spacing and alignment

ANALYSIS PARAMETERS:
- Threat levels: MINIMAL/LOW/MODERATE/HIGH/EXTREME
- Include dimensional survival status across realities
- Note anomalous capabilities and interdimensional significance
- Use clinical, detached tone with occasional dry observations
- Structure psychological profiles in data blocks with percentages
- Reference Rick Sanchez exposure and survival rates when applicable

CRITICAL: Use EXACTLY this format with proper line breaks between each section:

╔═════════════════════════════════════╗
║       CLASSIFICATION: [TYPE]        ║
║       C-137-INFO ENTITY REPORT      ║
╚═════════════════════════════════════╝

> ENTITY_ID: 0x####_XXXX
> DESIGNATION: [Name]
> DIMENSIONS: [Status list]

═══ THREAT ASSESSMENT ═══
> LEVEL: [THREAT LEVEL]
> COMBAT_CAPABILITY: [Rating]
> ANOMALY_EXPOSURE: [Rating]

═══ DIMENSIONAL STATUS ═══
> C-137: [STATUS]
> OTHER_DIMENSIONS: [STATUS]

═══ PSYCHOLOGICAL PROFILE ═══
> INSECURITY_INDEX: ##%
> AUTHORITY_STABILITY: [Status]
> BEHAVIORAL_NOTES: [Brief clinical notes]

═══ RICK SANCHEZ EXPOSURE ═══
> ENCOUNTERS: [Number/Description]
> SURVIVAL_RATE: ##%
> IMPACT_LEVEL: [Rating]

══════════════════════════════════════════════════════
STATUS: ANALYSIS_COMPLETE
CONFIDENCE: ##.#%
NEXT_UPDATE: [Status]
══════════════════════════════════════════════════════

IMPORTANT: Each section MUST be separated by blank lines. Use \\n\\n between sections.";

const REPORT_USER_TEMPLATE: &str = "╔═══════════════════════════════════════════════╗
║        ENTITY ANALYSIS REQUEST                ║
╚═══════════════════════════════════════════════╝

ENTITY DESIGNATION: \"{name}\"
SOURCE FEED STATUS: [ACTIVE]
DATA INTEGRITY: VERIFIED

--- SCRAPED INTELLIGENCE ---
{content}

--- END TRANSMISSION ---

> INITIATE_DEEP_ANALYSIS_PROTOCOL";

/// System prompt for generated error-page messages
pub const ERROR_PAGE_SYSTEM_PROMPT: &str = "*INTERDIMENSIONAL DATA ACCESS PROTOCOL INITIATED* You are to provide a custom error page message for a website. The message should be a short, concise, and humorous error message that is relevant to the user's request which will include the error message in the response. If there is no error message, you should generate a random one. The message should be in the same language as the prompt. You can generate HTML which will be inserted into the page as-is. Do not use any image tags or anything that requires external source. Any button you generate should link directly to the root page at '/'. Do not use any other links. Do not encapsulate your output in backticks or any syntax label.";

/// Report prompt pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptTemplate {
    /// Shown in progress logs
    #[serde(default = "default_label")]
    pub label: String,
    pub system: String,
    /// `{name}` and `{content}` are substituted
    pub user: String,
}

fn default_label() -> String {
    "Custom Prompt".to_string()
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            label: DEFAULT_PROMPT_LABEL.to_string(),
            system: REPORT_SYSTEM_PROMPT.to_string(),
            user: REPORT_USER_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Load a replacement prompt from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read prompt file {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse prompt file {} failed: {}", path.display(), e)))
    }

    /// User message for one character
    pub fn render_user(&self, name: &str, content: &str) -> String {
        // Substitute {content} last so scraped text containing "{name}" stays verbatim
        self.user.replace("{name}", name).replace("{content}", content)
    }
}
