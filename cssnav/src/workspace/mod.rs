pub mod source;

use anyhow::anyhow;
use std::collections::HashMap;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use crate::config::PositionEncoding;
use crate::interop::lsp_to_cssnav;
use source::Source;

/// Documents the client has opened, keyed by url.
pub struct Workspace {
    pub files: HashMap<Url, Source>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn open(&mut self, url: Url, doc: Source) {
        self.files.insert(url, doc);
    }

    pub fn close(&mut self, uri: &Url) {
        self.files.remove(uri);
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn get_document_ref(&self, uri: &Url) -> FsResult<&Source> {
        self.files
            .get(uri)
            .ok_or_else(|| FsError::NotProvided(anyhow!("URI not found: {uri}")))
    }

    pub fn get_document_mut(&mut self, uri: &Url) -> FsResult<&mut Source> {
        self.files
            .get_mut(uri)
            .ok_or_else(|| FsError::NotProvided(anyhow!("URI not found: {uri}")))
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.files.values()
    }

    pub fn edit(
        &mut self,
        uri: &Url,
        version: i32,
        changes: impl IntoIterator<Item = TextDocumentContentChangeEvent>,
        position_encoding: PositionEncoding,
    ) -> FsResult<()> {
        let source = self.get_document_mut(uri)?;
        changes
            .into_iter()
            .for_each(|change| Self::apply_one_change(source, change, position_encoding));
        source.version = version;
        Ok(())
    }

    fn apply_one_change(
        source: &mut Source,
        change: TextDocumentContentChangeEvent,
        position_encoding: PositionEncoding,
    ) {
        let replacement = change.text;

        match change.range {
            Some(lsp_range) => {
                let range = lsp_to_cssnav::range(&lsp_range, position_encoding, source);
                source.edit(range, &replacement);
            }
            None => {
                source.replace(replacement);
            }
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;

#[derive(thiserror::Error, Debug)]
pub enum FsError {
    #[error("the client has not opened the requested URI")]
    NotProvided(#[source] anyhow::Error),
}
