pub mod table {
    use std::fmt::Write as _;

    fn rule(widths: &[usize]) -> String {
        widths.iter().fold(String::from("+"), |mut s, w| {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
            s
        })
    }

    fn row(cells: &[&str], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (i, &w) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let _ = write!(s, " {cell:<w$} |");
        }
        s
    }

    /// Render headers and rows as a boxed ASCII table. Missing cells render empty.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for r in rows {
            for (w, cell) in widths.iter_mut().zip(r) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let sep = rule(&widths);
        let mut lines = vec![sep.clone(), row(headers, &widths), sep.clone()];
        for r in rows {
            let cells: Vec<&str> = r.iter().map(String::as_str).collect();
            lines.push(row(&cells, &widths));
        }
        lines.push(sep);
        lines.join("\n")
    }
}

pub mod config {
    use crate::errors::GraphError;
    use crate::visualization::{DotOptions, GraphmlOptions, OutputFormat, RankDir};
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;

    pub const DEFAULT_CONFIG_FILE: &str = "adjgraph.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DotConfig {
        pub graph_name: Option<String>,
        pub rankdir: Option<String>, // "LR" | "TB"
        pub ranksep: Option<u32>,
        pub fontname: Option<String>,
        pub fontsize: Option<u32>,
        pub node_shape: Option<String>,
        pub node_style: Option<String>,
        pub fillcolor: Option<String>,
        pub bgcolor: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct GraphmlConfig {
        pub fillcolor: Option<String>,
        pub shape: Option<String>,
        pub width: Option<f64>,
        pub height: Option<f64>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct RenderConfig {
        pub default_format: Option<String>, // "dot" | "graphml"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct MergeConfig {
        /// Leading name components kept by version squashing.
        pub squash_components: Option<usize>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub dot: Option<DotConfig>,
        pub graphml: Option<GraphmlConfig>,
        pub render: Option<RenderConfig>,
        pub merge: Option<MergeConfig>,
    }

    impl Config {
        #[must_use]
        pub fn dot_options(&self) -> DotOptions {
            let mut o = DotOptions::default();
            let Some(d) = self.dot.clone() else {
                return o;
            };
            if let Some(v) = d.graph_name {
                o.graph_name = v;
            }
            if let Some(v) = d.rankdir {
                o.rankdir = if v == "TB" { RankDir::TB } else { RankDir::LR };
            }
            if let Some(v) = d.ranksep {
                o.ranksep = v;
            }
            if let Some(v) = d.fontname {
                o.fontname = v;
            }
            if let Some(v) = d.fontsize {
                o.fontsize = v;
            }
            if let Some(v) = d.node_shape {
                o.node_shape = v;
            }
            if let Some(v) = d.node_style {
                o.node_style = v;
            }
            if let Some(v) = d.fillcolor {
                o.fillcolor = v;
            }
            if let Some(v) = d.bgcolor {
                o.bgcolor = v;
            }
            o
        }

        #[must_use]
        pub fn graphml_options(&self) -> GraphmlOptions {
            let mut o = GraphmlOptions::default();
            let Some(g) = self.graphml.clone() else {
                return o;
            };
            if let Some(v) = g.fillcolor {
                o.fillcolor = v;
            }
            if let Some(v) = g.shape {
                o.shape = v;
            }
            if let Some(v) = g.width {
                o.width = v;
            }
            if let Some(v) = g.height {
                o.height = v;
            }
            o
        }

        /// Format named by `[render] default_format`, if it names a known one.
        #[must_use]
        pub fn default_format(&self) -> Option<OutputFormat> {
            match self.render.as_ref()?.default_format.as_deref()? {
                "dot" => Some(OutputFormat::Dot),
                "graphml" => Some(OutputFormat::Graphml),
                other => {
                    tracing::warn!(format = other, "ignoring unknown default_format in config");
                    None
                }
            }
        }

        #[must_use]
        pub fn squash_components(&self) -> Option<usize> {
            self.merge.as_ref()?.squash_components
        }
    }

    /// Load the configuration file at `path`.
    ///
    /// # Errors
    /// Returns `GraphError::Read` if the file cannot be read and
    /// `GraphError::Config` if it is not valid TOML for `Config`.
    pub fn load_config_at(path: &Path) -> Result<Config, GraphError> {
        let data = fs::read_to_string(path)
            .map_err(|source| GraphError::Read { file: path.to_path_buf(), source })?;
        toml::from_str::<Config>(&data).map_err(|source| GraphError::Config { path: path.to_path_buf(), source })
    }

    /// Load `adjgraph.toml` from `dir` when it exists.
    ///
    /// # Errors
    /// As `load_config_at` for an existing but unreadable or malformed file.
    pub fn load_config_near(dir: &Path) -> Result<Option<Config>, GraphError> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            load_config_at(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}
