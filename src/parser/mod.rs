use crate::errors::GraphError;
use crate::graph::GraphModel;
use std::io::BufRead;
use std::path::Path;

/// One `KEY=V1,V2,...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a str,
    pub values: Vec<&'a str>,
}

/// Parse a single record line.
///
/// Returns `None` for blank lines. Anything after a second `=` is ignored and
/// empty value entries (`A=B,,C`, `A=`) are skipped. A zero-length key is accepted.
#[must_use]
pub fn parse_record(line: &str) -> Option<Record<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut parts = line.split('=');
    let key = parts.next()?;
    let values = parts
        .next()
        .map(|rhs| rhs.split(',').filter(|v| !v.is_empty()).collect())
        .unwrap_or_default();
    Some(Record { key, values })
}

/// Builds a `GraphModel` from adjacency records.
///
/// Parsing order determines node creation order, and with it the default
/// root order used by the renderer.
#[derive(Debug, Default)]
pub struct RecordParser {
    graph: GraphModel,
    records: usize,
}

impl RecordParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a parser whose resulting graph carries `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { graph: GraphModel::named(name), records: 0 }
    }

    /// Feed one line into the graph being built.
    pub fn parse_line(&mut self, line: &str) {
        let Some(record) = parse_record(line) else {
            return;
        };
        self.records += 1;
        self.graph.get_or_create_node(record.key);
        for value in record.values {
            self.graph.add_edge(record.key, value);
        }
    }

    pub fn parse_lines<'a, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            self.parse_line(line);
        }
    }

    /// Feed every line of `reader` into the graph being built.
    ///
    /// # Errors
    /// Returns the underlying I/O error if a line cannot be read or is not valid UTF-8.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<(), std::io::Error> {
        for line in reader.lines() {
            self.parse_line(&line?);
        }
        Ok(())
    }

    #[must_use]
    pub fn finish(self) -> GraphModel {
        tracing::debug!(
            graph = %self.graph.name,
            records = self.records,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "parsed adjacency records"
        );
        self.graph
    }

    /// Parse a whole string into a new unnamed graph.
    #[must_use]
    pub fn parse_str(content: &str) -> GraphModel {
        let mut parser = Self::new();
        parser.parse_lines(content.lines());
        parser.finish()
    }

    /// Parse the file at `path` into a graph named after the path.
    ///
    /// # Errors
    /// Returns `GraphError::Read` if the file cannot be opened or read.
    pub fn parse_file(path: &Path) -> Result<GraphModel, GraphError> {
        let read_err = |source| GraphError::Read { file: path.to_path_buf(), source };
        let file = std::fs::File::open(path).map_err(read_err)?;
        let mut parser = Self::named(path.display().to_string());
        parser.parse_reader(std::io::BufReader::new(file)).map_err(read_err)?;
        Ok(parser.finish())
    }
}
