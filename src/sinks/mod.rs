//! Sink implementations for the splitweld library.
//!
//! This module provides the sinks the collector writes outcomes into.

use async_trait::async_trait;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex as TokioMutex;

use crate::core::error::IntoError;
use crate::core::{Result, Sink};

/// A sink that prints each item on its own line to stdout.
pub struct PrintSink<T> {
    /// The prefix to print before each item
    prefix: Option<String>,
    _phantom: PhantomData<fn(T)>,
}

impl<T> PrintSink<T> {
    /// Create a new print sink
    pub fn new() -> Self {
        Self {
            prefix: None,
            _phantom: PhantomData,
        }
    }

    /// Create a new print sink with a prefix
    pub fn with_prefix(prefix: String) -> Self {
        Self {
            prefix: Some(prefix),
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Send + 'static + Display> Sink for PrintSink<T> {
    type Item = T;

    async fn write(&mut self, item: Self::Item) -> Result<()> {
        match &self.prefix {
            Some(prefix) => println!("{}: {}", prefix, item),
            None => println!("{}", item),
        }
        Ok(())
    }
}

impl<T> Default for PrintSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sink that collects items into a shared vector.
///
/// Clones share the same storage, so a clone kept by the caller can inspect
/// what the pipeline wrote after the run.
pub struct CollectSink<T> {
    items: Arc<TokioMutex<Vec<T>>>,
}

impl<T: Send + 'static + Clone> CollectSink<T> {
    /// Create a new collect sink
    pub fn new() -> Self {
        Self {
            items: Arc::new(TokioMutex::new(Vec::new())),
        }
    }

    /// Get a snapshot of the collected items
    pub async fn snapshot(&self) -> Vec<T> {
        self.items.lock().await.clone()
    }

    /// Get a clone of the items Arc for external access
    pub fn items(&self) -> Arc<TokioMutex<Vec<T>>> {
        self.items.clone()
    }
}

#[async_trait]
impl<T: Send + 'static> Sink for CollectSink<T> {
    type Item = T;

    async fn write(&mut self, item: Self::Item) -> Result<()> {
        self.items.lock().await.push(item);
        Ok(())
    }
}

impl<T: Send + 'static + Clone> Default for CollectSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CollectSink<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

/// A sink that writes one line per item to a file
pub struct FileSink<T> {
    writer: tokio::io::BufWriter<tokio::fs::File>,
    _phantom: PhantomData<fn(T)>,
}

impl<T> FileSink<T> {
    /// Create a new file sink, truncating any existing file
    pub async fn new<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let file = tokio::fs::File::create(path).await?;
        Ok(Self {
            writer: tokio::io::BufWriter::new(file),
            _phantom: PhantomData,
        })
    }

    /// Create a file sink that appends to existing file
    pub async fn append<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            writer: tokio::io::BufWriter::new(file),
            _phantom: PhantomData,
        })
    }
}

#[async_trait]
impl<T: Send + 'static + Display> Sink for FileSink<T> {
    type Item = T;

    async fn write(&mut self, item: Self::Item) -> Result<()> {
        let line = format!("{}\n", item);
        self.writer
            .write_all(line.as_bytes())
            .await
            .into_sink_error()
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await.into_sink_error()
    }
}
