//! Configuration types deserialized from `zft.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `zft.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacerConfig {
    /// Placement engine settings.
    #[serde(default)]
    pub placement: PlacementSection,
    /// Report output settings.
    #[serde(default)]
    pub output: OutputSection,
}

/// The `[placement]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementSection {
    /// Maximum number of passes over all logic blocks.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Radius of the window searched for a free cell around an occupied target.
    #[serde(default = "default_area_swap_size")]
    pub area_swap_size: u32,
    /// How logic blocks are placed before optimization starts.
    #[serde(default)]
    pub initial: InitialMode,
    /// When a block may swap with the occupant of its target cell.
    #[serde(default)]
    pub swap_policy: SwapMode,
    /// Seed for the random initial placement; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Report every individual move and swap.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for PlacementSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            area_swap_size: default_area_swap_size(),
            initial: InitialMode::default(),
            swap_policy: SwapMode::default(),
            seed: None,
            verbose: false,
        }
    }
}

fn default_iterations() -> u32 {
    600
}

fn default_area_swap_size() -> u32 {
    8
}

/// Initial placement strategy for logic blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialMode {
    /// Uniformly random free interior cells.
    Random,
    /// Walk nets in ascending crossing-count order, filling cells in scan order.
    #[default]
    NetOrder,
}

/// Swap acceptance policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapMode {
    /// Swap, re-evaluate the combined cost, and revert unless it improved.
    #[default]
    Verified,
    /// Swap whenever the moving block costs more than the occupant.
    CostCompare,
}

/// The `[output]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Directory placement reports are written to.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Report file format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            format: OutputFormat::default(),
        }
    }
}

fn default_directory() -> String {
    ".".to_string()
}

/// Placement report file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// VPR-compatible `.place` text.
    #[default]
    Place,
    /// JSON document.
    Json,
}

impl OutputFormat {
    /// File extension used for reports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Place => "place",
            OutputFormat::Json => "json",
        }
    }
}
