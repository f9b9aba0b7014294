//! Rendering configuration passed explicitly to every formatter.

/// RGB colour.
pub type Rgb = [u8; 3];

/// Pixel size of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

/// Style and layout of rendered artifacts.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Size of `figures/basic_analysis.png`.
    pub basic_size: FigureSize,
    /// Size of `figures/cultural_model_analysis.png`.
    pub cultural_size: FigureSize,
    /// Margin inside each panel, in pixels.
    pub panel_padding: u32,
    /// Number of histogram bins.
    pub histogram_bins: usize,
    /// Draw captions, axis labels, heatmap annotations and legends.
    pub labels: bool,
    pub background: Rgb,
    pub axis: Rgb,
    pub grid: Rgb,
    /// Response-time histogram fill.
    pub response_time_color: Rgb,
    /// Word-count histogram fill.
    pub word_count_color: Rgb,
    /// Box plot fill by culture.
    pub culture_box_color: Rgb,
    /// Box plot fill by model.
    pub model_box_color: Rgb,
    /// Series colours for grouped bars, cycled.
    pub series_colors: Vec<Rgb>,
    /// Low and high end of the response-time heatmap gradient.
    pub response_time_heat: (Rgb, Rgb),
    /// Low and high end of the word-count heatmap gradient.
    pub word_count_heat: (Rgb, Rgb),
    /// Title of the interactive dashboard.
    pub dashboard_title: String,
    /// Height of the interactive dashboard in pixels.
    pub dashboard_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            basic_size: FigureSize {
                width: 1400,
                height: 1000,
            },
            cultural_size: FigureSize {
                width: 1600,
                height: 1200,
            },
            panel_padding: 40,
            histogram_bins: 30,
            labels: true,
            background: [255, 255, 255],
            axis: [60, 60, 60],
            grid: [225, 225, 225],
            response_time_color: [135, 206, 235],
            word_count_color: [144, 238, 144],
            culture_box_color: [85, 168, 104],
            model_box_color: [196, 78, 82],
            series_colors: vec![
                [240, 128, 128],
                [173, 216, 230],
                [31, 119, 180],
                [255, 127, 14],
                [44, 160, 44],
                [214, 39, 40],
                [148, 103, 189],
                [140, 86, 75],
            ],
            response_time_heat: ([255, 255, 204], [189, 0, 38]),
            word_count_heat: ([247, 251, 255], [8, 48, 107]),
            dashboard_title: "Cross-Cultural AI Evaluation Dashboard".to_string(),
            dashboard_height: 800,
        }
    }
}
