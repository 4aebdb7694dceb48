//! Channel-fed graph aggregation.
//!
//! Scan workers never share the graph. Each one holds a [`GraphSink`]
//! and sends finished [`FileNode`]s; the single [`GraphBuilder`] owns the
//! accumulator and hands out the graph once every sink is gone.

use super::{FileNode, ProjectGraph};
use tokio::sync::mpsc;
use tracing::debug;

/// Producer handle given to scan workers.
#[derive(Debug, Clone)]
pub struct GraphSink {
    tx: mpsc::UnboundedSender<FileNode>,
}

impl GraphSink {
    /// Append a parsed file. Returns false if the builder is gone.
    pub fn push(&self, node: FileNode) -> bool {
        self.tx.send(node).is_ok()
    }
}

/// Exclusive owner of the graph under construction.
pub struct GraphBuilder {
    rx: mpsc::UnboundedReceiver<FileNode>,
    graph: ProjectGraph,
}

impl GraphBuilder {
    /// Create a builder and its first sink.
    pub fn channel() -> (GraphSink, GraphBuilder) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            GraphSink { tx },
            GraphBuilder {
                rx,
                graph: ProjectGraph::new(),
            },
        )
    }

    /// Drain the channel until every sink has been dropped and return the
    /// finished graph, sorted by path.
    pub async fn build(mut self) -> ProjectGraph {
        while let Some(node) = self.rx.recv().await {
            self.graph.files.push(node);
        }

        self.graph.sort();
        debug!(files = self.graph.len(), "Graph assembled");
        self.graph
    }
}
