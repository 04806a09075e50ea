//! phptools LSP Server - live `use` statement checks for PHP.
//!
//! Provides IDE integration with:
//! - Diagnostics on open/change/save: missing uses (error) and unused uses
//!   (warning, tagged unnecessary)
//! - A "Generate constructor" code action inserting a constructor at the
//!   requested position
//!
//! Only documents whose language id names PHP are analyzed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use phptools_core::{
    check_source, generate_constructor, is_php_syntax, use_statement_spans, CheckReport, Template,
};

const SOURCE: &str = "phptools";
const GENERATE_CONSTRUCTOR_TITLE: &str = "Generate constructor";

/// An open document snapshot.
#[derive(Debug, Clone)]
struct Document {
    language_id: String,
    text: String,
}

impl Document {
    fn is_php(&self) -> bool {
        is_php_syntax(&self.language_id)
    }
}

/// phptools Language Server state.
struct PhptoolsLsp {
    client: Client,
    /// Open documents by URI.
    documents: Arc<RwLock<HashMap<Url, Document>>>,
}

impl PhptoolsLsp {
    fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn snapshot(&self, uri: &Url) -> Option<Document> {
        self.documents.read().await.get(uri).cloned()
    }

    /// Run the declaration check on the current text of `uri` and publish.
    async fn run_analysis(&self, uri: Url) {
        let Some(doc) = self.snapshot(&uri).await else {
            return;
        };

        if !doc.is_php() {
            self.log_info(&format!(
                "Only available in a PHP file, skipping {} ({})",
                uri, doc.language_id
            ))
            .await;
            return;
        }

        match compute_diagnostics(&uri, &doc.text) {
            Ok(diagnostics) => {
                self.client
                    .publish_diagnostics(uri, diagnostics, None)
                    .await;
            }
            Err(e) => {
                self.log_error(&format!("Analysis failed: {:#}", e)).await;
            }
        }
    }

    async fn log_info(&self, message: &str) {
        self.client.log_message(MessageType::INFO, message).await;
    }

    async fn log_error(&self, message: &str) {
        self.client.log_message(MessageType::ERROR, message).await;
    }
}

/// Directory whose sibling files count as declarations for `uri`.
fn containing_dir(uri: &Url) -> Result<PathBuf> {
    let path = uri
        .to_file_path()
        .map_err(|_| anyhow!("Invalid file URI: {}", uri))?;
    Ok(path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn compute_diagnostics(uri: &Url, text: &str) -> Result<Vec<Diagnostic>> {
    let dir = containing_dir(uri)?;
    let report = check_source(text, &dir)?;
    Ok(report_diagnostics(text, &report))
}

/// Converts a byte offset of `text` into an LSP position (UTF-16 columns).
fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character: usize = text[line_start..offset]
        .chars()
        .map(char::len_utf16)
        .sum();
    Position {
        line: line as u32,
        character: character as u32,
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// First occurrence of `needle` in `text` not glued to an identifier on its left.
fn locate(text: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let bytes = text.as_bytes();
    let mut start = from.min(text.len());
    while let Some(pos) = text[start..].find(needle) {
        let at = start + pos;
        if at == 0 || !is_ident_byte(bytes[at - 1]) {
            return Some(at);
        }
        start = at + needle.len();
    }
    None
}

fn range_of(text: &str, needle: &str, from: usize) -> Option<Range> {
    locate(text, needle, from).map(|at| Range {
        start: offset_to_position(text, at),
        end: offset_to_position(text, at + needle.len()),
    })
}

/// Maps a report onto diagnostics: unused declarations are located in the
/// first `use` statement naming them, missing references at their first
/// occurrence after the last `use` statement.
fn report_diagnostics(text: &str, report: &CheckReport) -> Vec<Diagnostic> {
    let spans = use_statement_spans(text);
    let first_use = spans.first().map(|span| span.start).unwrap_or(0);
    let last_use = spans.last().map(|span| span.end).unwrap_or(0);
    let mut diagnostics = Vec::with_capacity(report.missing.len() + report.unused.len());

    for name in &report.missing {
        let range = range_of(text, name, last_use)
            .or_else(|| range_of(text, name, 0))
            .unwrap_or_default();
        diagnostics.push(Diagnostic {
            range,
            severity: Some(DiagnosticSeverity::ERROR),
            code: Some(NumberOrString::String("missing-use".to_string())),
            source: Some(SOURCE.to_string()),
            message: format!("Missing use: `{}` is referenced but never imported", name),
            ..Diagnostic::default()
        });
    }

    for name in &report.unused {
        diagnostics.push(Diagnostic {
            range: range_of(text, name, first_use).unwrap_or_default(),
            severity: Some(DiagnosticSeverity::WARNING),
            code: Some(NumberOrString::String("unused-use".to_string())),
            source: Some(SOURCE.to_string()),
            message: format!("Unused use: `{}` is never referenced", name),
            tags: Some(vec![DiagnosticTag::UNNECESSARY]),
            ..Diagnostic::default()
        });
    }

    diagnostics
}

/// Code action inserting a generated constructor at `at`, if the text has
/// documented properties.
fn constructor_action(uri: &Url, text: &str, at: Position) -> Option<CodeActionOrCommand> {
    let code = generate_constructor(text, &Template::builtin())?;

    let mut changes = HashMap::new();
    changes.insert(
        uri.clone(),
        vec![TextEdit {
            range: Range { start: at, end: at },
            new_text: code,
        }],
    );

    Some(CodeActionOrCommand::CodeAction(CodeAction {
        title: GENERATE_CONSTRUCTOR_TITLE.to_string(),
        kind: Some(CodeActionKind::REFACTOR),
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            ..WorkspaceEdit::default()
        }),
        ..CodeAction::default()
    }))
}

#[tower_lsp::async_trait]
impl LanguageServer for PhptoolsLsp {
    async fn initialize(&self, _: InitializeParams) -> LspResult<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: "phptools-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.log_info("phptools LSP server initialized").await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        {
            let mut docs = self.documents.write().await;
            docs.insert(
                item.uri.clone(),
                Document {
                    language_id: item.language_id,
                    text: item.text,
                },
            );
        }
        self.run_analysis(item.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the last change holds the whole text.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        {
            let mut docs = self.documents.write().await;
            match docs.get_mut(&uri) {
                Some(doc) => doc.text = change.text,
                None => return,
            }
        }
        self.run_analysis(uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(text) = params.text {
            if let Some(doc) = self.documents.write().await.get_mut(&uri) {
                doc.text = text;
            }
        }
        self.run_analysis(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.remove(&uri);
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let Some(doc) = self.snapshot(&uri).await else {
            return Ok(None);
        };
        if !doc.is_php() {
            return Ok(None);
        }

        Ok(constructor_action(&uri, &doc.text, params.range.start).map(|action| vec![action]))
    }
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] phptools-lsp internal error: {}", info);
    }));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(PhptoolsLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_position() {
        let text = "<?php\nuse Foo\\Bar;\nnew Bar();";
        assert_eq!(offset_to_position(text, 0), Position { line: 0, character: 0 });
        assert_eq!(offset_to_position(text, 10), Position { line: 1, character: 4 });
        assert_eq!(offset_to_position(text, 999).line, 2);
    }

    #[test]
    fn test_offset_to_position_utf16() {
        let text = "// é\nnew X();";
        let at = text.find('X').unwrap();
        assert_eq!(offset_to_position(text, at), Position { line: 1, character: 4 });
        assert_eq!(offset_to_position("\u{1F600}x", 4), Position { line: 0, character: 2 });
    }

    #[test]
    fn test_locate_skips_identifier_suffixes() {
        let text = "$subBar = 1; new Bar();";
        assert_eq!(locate(text, "Bar", 0), Some(17));
        assert_eq!(locate(text, "Baz", 0), None);
    }

    #[test]
    fn test_report_diagnostics() {
        let text = "<?php\nuse App\\Unused;\n\nnew Baz();\n";
        let report = CheckReport {
            missing: vec!["Baz".to_string()],
            unused: vec!["App\\Unused".to_string()],
        };
        let diagnostics = report_diagnostics(text, &report);
        assert_eq!(diagnostics.len(), 2);

        let missing = &diagnostics[0];
        assert_eq!(missing.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(missing.range.start, Position { line: 3, character: 4 });

        let unused = &diagnostics[1];
        assert_eq!(unused.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(unused.range.start, Position { line: 1, character: 4 });
        assert_eq!(unused.tags, Some(vec![DiagnosticTag::UNNECESSARY]));
    }

    #[test]
    fn test_diagnostics_ignore_use_inside_words() {
        let text = "<?php\n// because App\\Unused is kept for BC\nuse App\\Unused;\n\nnew Baz();\n// because Baz is needed\n";
        let report = CheckReport {
            missing: vec!["Baz".to_string()],
            unused: vec!["App\\Unused".to_string()],
        };
        let diagnostics = report_diagnostics(text, &report);

        assert_eq!(diagnostics[0].range.start, Position { line: 4, character: 4 });
        assert_eq!(diagnostics[1].range.start, Position { line: 2, character: 4 });
    }

    #[test]
    fn test_constructor_action() {
        let uri = Url::parse("file:///project/src/User.php").unwrap();
        let text = "<?php\nclass User\n{\n    /**\n     * @var int\n     */\n    public $id;\n}\n";
        let at = Position { line: 7, character: 0 };

        let Some(CodeActionOrCommand::CodeAction(action)) = constructor_action(&uri, text, at) else {
            panic!("Expected a code action");
        };
        assert_eq!(action.title, GENERATE_CONSTRUCTOR_TITLE);
        let changes = action.edit.unwrap().changes.unwrap();
        let edits = &changes[&uri];
        assert_eq!(edits[0].range.start, at);
        assert!(edits[0].new_text.contains("public function __construct(int $id)"));
    }

    #[test]
    fn test_no_constructor_action_without_properties() {
        let uri = Url::parse("file:///project/src/Empty.php").unwrap();
        assert!(constructor_action(&uri, "<?php\nclass Empty {}\n", Position::default()).is_none());
    }

    #[test]
    fn test_containing_dir() {
        let uri = Url::parse("file:///project/src/User.php").unwrap();
        assert_eq!(containing_dir(&uri).unwrap(), PathBuf::from("/project/src"));
        let bad = Url::parse("untitled:Untitled-1").unwrap();
        assert!(containing_dir(&bad).is_err());
    }
}
