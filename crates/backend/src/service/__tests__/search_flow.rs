//! Integration tests for search orchestration.

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use crate::{
    remote::{RemoteError, mock::MockBackend},
    service::{__tests__::helpers::TestContext, search::NO_RESULTS_MESSAGE},
  };

  /// Test the full search flow.
  ///
  /// Validates:
  /// 1. The project is indexed before querying
  /// 2. The query carries exactly the persisted blob set
  /// 3. The formatted retrieval text is returned as-is
  #[tokio::test]
  async fn test_search_indexes_then_queries_persisted_set() {
    let ctx = TestContext::with_backend(MockBackend::new().with_retrieval("src/auth.rs:\nfn login() {}"), |_| {});
    ctx.write_file("src/auth.rs", "fn login() {}\n");
    ctx.write_file("src/db.rs", "fn connect() {}\n");

    let text = ctx.search.search_context(ctx.root(), "where is login handled?").await;

    assert_eq!(text, "src/auth.rs:\nfn login() {}");
    assert_eq!(ctx.remote().upload_calls(), 1);
    assert_eq!(ctx.remote().retrieve_calls(), 1);

    let request = ctx.remote().last_request().unwrap();
    assert_eq!(request.information_request, "where is login handled?");
    assert_eq!(request.blobs.added_blobs, ctx.stored_hashes().await);
    assert!(request.blobs.deleted_blobs.is_empty());
    assert!(request.blobs.checkpoint_id.is_none());
    assert!(request.dialog.is_empty());
    assert!(!request.disable_codebase_retrieval);
    assert!(!request.enable_commit_retrieval);
  }

  #[tokio::test]
  async fn test_every_search_reindexes() {
    let ctx = TestContext::with_backend(MockBackend::new().with_retrieval("hit"), |_| {});
    ctx.write_file("a.rs", "a\n");

    ctx.search.search_context(ctx.root(), "first").await;
    ctx.write_file("b.rs", "b\n");
    ctx.search.search_context(ctx.root(), "second").await;

    assert_eq!(ctx.remote().upload_calls(), 2);
    assert_eq!(ctx.remote().retrieve_calls(), 2);
    let request = ctx.remote().last_request().unwrap();
    assert_eq!(request.blobs.added_blobs.len(), 2);
  }

  #[tokio::test]
  async fn test_empty_retrieval_returns_no_results_message() {
    let ctx = TestContext::new();
    ctx.write_file("a.rs", "a\n");

    let text = ctx.search.search_context(ctx.root(), "anything").await;

    assert_eq!(text, NO_RESULTS_MESSAGE);
  }

  #[tokio::test]
  async fn test_indexing_error_aborts_search() {
    let ctx = TestContext::new();
    let missing = ctx.root().join("missing");

    let text = ctx.search.search_context(&missing, "anything").await;

    assert!(text.starts_with("Error: Failed to index project."), "{text}");
    assert_eq!(ctx.remote().retrieve_calls(), 0);
  }

  #[tokio::test]
  async fn test_empty_project_aborts_search() {
    let ctx = TestContext::new();

    let text = ctx.search.search_context(ctx.root(), "anything").await;

    assert!(text.starts_with("Error:"), "{text}");
    assert_eq!(ctx.remote().retrieve_calls(), 0);
  }

  #[tokio::test]
  async fn test_partial_index_still_searches() {
    let backend = MockBackend::failing_on_path("poison").with_retrieval("partial hit");
    let ctx = TestContext::with_backend(backend, |config| config.batch_size = 1);
    ctx.write_file("a.rs", "a\n");
    ctx.write_file("poison.rs", "p\n");

    let text = ctx.search.search_context(ctx.root(), "anything").await;

    assert_eq!(text, "partial hit");
    let request = ctx.remote().last_request().unwrap();
    assert_eq!(request.blobs.added_blobs.len(), 1);
  }

  #[tokio::test]
  async fn test_all_batches_failing_leaves_nothing_to_search() {
    let ctx = TestContext::with_backend(MockBackend::failing_on_path(".rs"), |_| {});
    ctx.write_file("a.rs", "a\n");

    let text = ctx.search.search_context(ctx.root(), "anything").await;

    assert!(text.starts_with("Error: No indexed content"), "{text}");
    assert_eq!(ctx.remote().retrieve_calls(), 0);
  }

  #[tokio::test]
  async fn test_permanent_retrieval_error_is_rendered() {
    let backend = MockBackend::new().with_retrieval_error(RemoteError::Status {
      status: 404,
      body: "not found".to_string(),
    });
    let ctx = TestContext::with_backend(backend, |_| {});
    ctx.write_file("a.rs", "a\n");

    let text = ctx.search.search_context(ctx.root(), "anything").await;

    assert_eq!(text, "Error: Remote service error: Remote service returned 404: not found");
    assert_eq!(ctx.remote().retrieve_calls(), 1);
  }

  #[tokio::test]
  async fn test_transient_retrieval_error_is_retried() {
    let backend = MockBackend::new().with_retrieval_error(RemoteError::Status {
      status: 503,
      body: String::new(),
    });
    let ctx = TestContext::with_backend(backend, |_| {});
    ctx.write_file("a.rs", "a\n");

    let text = ctx.search.search_context(ctx.root(), "anything").await;

    assert!(text.starts_with("Error:"), "{text}");
    assert_eq!(ctx.remote().retrieve_calls(), 3);
  }
}
