//! Path dialog adapters

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::PathDialog;
use crate::errors::Result;
use crate::link::{DialogOptions, DialogSelection};

/// Dialog answering from a queue of prepared selections.
///
/// Used where no interactive picker exists (command line, tests). An
/// exhausted queue answers like a dismissed dialog.
#[derive(Default)]
pub struct PresetDialog {
    answers: Mutex<VecDeque<Option<DialogSelection>>>,
    requests: Mutex<Vec<DialogOptions>>,
}

impl PresetDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, answer: Option<DialogSelection>) {
        self.answers.lock().push_back(answer);
    }

    /// Queue a confirmed selection of the given paths
    pub fn push_paths(&self, mut paths: Vec<String>) {
        let selection = if paths.len() == 1 {
            DialogSelection::Single(paths.remove(0))
        } else {
            DialogSelection::Multiple(paths)
        };
        self.push(Some(selection));
    }

    pub fn push_cancel(&self) {
        self.push(None);
    }

    pub fn pending(&self) -> usize {
        self.answers.lock().len()
    }

    /// Options of every request received so far
    pub fn requests(&self) -> Vec<DialogOptions> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PathDialog for PresetDialog {
    async fn open(&self, options: DialogOptions) -> Result<Option<DialogSelection>> {
        self.requests.lock().push(options);
        let answer = self.answers.lock().pop_front().flatten();

        // 单选对话框只会返回一个路径
        Ok(answer.map(|selection| match selection {
            DialogSelection::Multiple(paths) if !options.multiple => {
                debug!("Single-selection dialog given {} paths, keeping the first", paths.len());
                match paths.into_iter().next() {
                    Some(first) => DialogSelection::Single(first),
                    None => DialogSelection::Multiple(Vec::new()),
                }
            }
            other => other,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_in_order_then_cancels() {
        let dialog = PresetDialog::new();
        dialog.push_paths(vec!["/a".into()]);
        dialog.push_cancel();

        let options = DialogOptions::default();
        assert_eq!(
            dialog.open(options).await.unwrap(),
            Some(DialogSelection::Single("/a".into()))
        );
        assert_eq!(dialog.open(options).await.unwrap(), None);
        // 队列耗尽后等同取消
        assert_eq!(dialog.open(options).await.unwrap(), None);
        assert_eq!(dialog.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_single_selection_keeps_first_path() {
        let dialog = PresetDialog::new();
        dialog.push_paths(vec!["/a".into(), "/b".into()]);

        let answer = dialog
            .open(DialogOptions {
                directory: true,
                multiple: false,
            })
            .await
            .unwrap();
        assert_eq!(answer, Some(DialogSelection::Single("/a".into())));
    }
}
