//! Content-add operations.

use std::path::Path;

use tracing::{debug, instrument};

use mcs_core::error::{McsError, Result};
use mcs_core::{AddResult, ENDPOINT_ADD, OPT_CID_VERSION, OPT_HASH, OPT_ONLY_HASH, OPT_PIN,
    OPT_PROGRESS, OPT_RAW_LEAVES, OPT_RECURSIVE};

use crate::files;
use crate::shell::{RequestBuilder, Shell};

/// Options for [`Shell::add`].
///
/// Unset fields contribute no query option, so the node's own defaults apply.
#[derive(Clone, Debug, Default)]
pub struct AddOptions {
    only_hash: Option<bool>,
    pin: Option<bool>,
    progress: Option<bool>,
    raw_leaves: Option<bool>,
    hash: Option<String>,
    cid_version: Option<u32>,
}

impl AddOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the hash without writing anything to the node.
    pub fn only_hash(mut self, enabled: bool) -> Self {
        self.only_hash = Some(enabled);
        self
    }

    /// Pin (or explicitly do not pin) the added content.
    pub fn pin(mut self, enabled: bool) -> Self {
        self.pin = Some(enabled);
        self
    }

    /// Stream progress events while adding.
    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = Some(enabled);
        self
    }

    /// Store small leaves without the extra wrapping format.
    pub fn raw_leaves(mut self, enabled: bool) -> Self {
        self.raw_leaves = Some(enabled);
        self
    }

    /// Selects the multihash algorithm (e.g. "sha2-256", "blake2b-256").
    pub fn hash(mut self, algorithm: impl Into<String>) -> Self {
        self.hash = Some(algorithm.into());
        self
    }

    /// Selects the CID version the node should produce.
    pub fn cid_version(mut self, version: u32) -> Self {
        self.cid_version = Some(version);
        self
    }

    fn apply(&self, mut rb: RequestBuilder) -> RequestBuilder {
        if let Some(v) = self.only_hash {
            rb = rb.option(OPT_ONLY_HASH, v);
        }
        if let Some(v) = self.pin {
            rb = rb.option(OPT_PIN, v);
        }
        if let Some(v) = self.progress {
            rb = rb.option(OPT_PROGRESS, v);
        }
        if let Some(v) = self.raw_leaves {
            rb = rb.option(OPT_RAW_LEAVES, v);
        }
        if let Some(algorithm) = &self.hash {
            rb = rb.option(OPT_HASH, algorithm);
        }
        if let Some(v) = self.cid_version {
            rb = rb.option(OPT_CID_VERSION, v);
        }
        rb
    }
}

impl Shell {
    /// Adds `data` to the gateway as a single virtual file and returns the
    /// assigned hash.
    #[instrument(skip(self, data))]
    pub async fn add(&self, data: Vec<u8>, options: &AddOptions) -> Result<String> {
        let form = files::single_file_form(data)?;
        let out: AddResult = options
            .apply(self.request(ENDPOINT_ADD))
            .body(form)
            .exec()
            .await?;

        debug!(hash = %out.hash, "added content");
        Ok(out.hash)
    }

    /// Adds `data` without pinning it.
    #[deprecated(note = "use `add` with `AddOptions::new().pin(false)` instead")]
    pub async fn add_no_pin(&self, data: Vec<u8>) -> Result<String> {
        self.add(data, &AddOptions::new().pin(false)).await
    }

    /// Adds `data` with explicit pin and raw-leaves settings.
    #[deprecated(note = "use `add` with `AddOptions` instead")]
    pub async fn add_with_opts(
        &self,
        data: Vec<u8>,
        pin: bool,
        raw_leaves: bool,
    ) -> Result<String> {
        self.add(data, &AddOptions::new().pin(pin).raw_leaves(raw_leaves))
            .await
    }

    /// Adds a symlink entry pointing at `target` and returns the assigned
    /// hash. Only the target path string is transmitted.
    #[instrument(skip(self))]
    pub async fn add_link(&self, target: &str) -> Result<String> {
        let form = files::symlink_form(target)?;
        let out: AddResult = self.request(ENDPOINT_ADD).body(form).exec().await?;
        Ok(out.hash)
    }

    /// Adds a directory recursively with all of the files under it.
    ///
    /// The gateway streams one JSON object per added entry; the last object
    /// describes the root directory and is what this returns. The path is
    /// stat'ed up front, so a missing directory fails before anything is
    /// sent.
    #[instrument(skip_all)]
    pub async fn add_dir(&self, dir: impl AsRef<Path>) -> Result<AddResult> {
        let dir = dir.as_ref();
        tokio::fs::symlink_metadata(dir).await?;

        let form = files::directory_form(dir).await?;
        let response = self
            .request(ENDPOINT_ADD)
            .option(OPT_RECURSIVE, true)
            .body(form)
            .send()
            .await?;

        let root = last_add_event(response).await?;
        debug!(path = %dir.display(), hash = %root.hash, "added directory");
        Ok(root)
    }

    /// Adds a directory recursively and hands back the raw streaming
    /// response, leaving the per-entry decode to the caller.
    #[instrument(skip_all)]
    pub async fn add_dir_raw(&self, dir: impl AsRef<Path>) -> Result<reqwest::Response> {
        let dir = dir.as_ref();
        tokio::fs::symlink_metadata(dir).await?;

        let form = files::directory_form(dir).await?;
        self.request(ENDPOINT_ADD)
            .option(OPT_RECURSIVE, true)
            .body(form)
            .send()
            .await
    }
}

/// Decodes the response as a finite sequence of concatenated JSON objects,
/// chunk by chunk as they arrive, and keeps the last one. A decode error
/// anywhere in the stream is a hard failure; an empty stream means the
/// gateway added nothing. The response is released when this returns or is
/// cancelled.
async fn last_add_event(mut response: reqwest::Response) -> Result<AddResult> {
    let mut buf: Vec<u8> = Vec::new();
    let mut offset = 0;
    let mut last: Option<AddResult> = None;

    loop {
        let chunk = response
            .chunk()
            .await
            .map_err(|e| McsError::Http(e.to_string()))?;
        let done = match chunk {
            Some(bytes) => {
                buf.extend_from_slice(&bytes);
                false
            }
            None => true,
        };

        offset += drain_events(&buf[offset..], done, &mut last)?;
        if done {
            break;
        }
    }

    last.ok_or_else(|| McsError::EmptyResponse("add response contained no entries".into()))
}

/// Decodes as many complete JSON objects as `buf` holds, recording the last
/// one, and returns how many bytes were consumed. A partial trailing object
/// is only an error once the stream is complete (`done`); until then it
/// stays in the buffer waiting for more bytes.
fn drain_events(buf: &[u8], done: bool, last: &mut Option<AddResult>) -> Result<usize> {
    let mut events = serde_json::Deserializer::from_slice(buf).into_iter::<AddResult>();
    loop {
        match events.next() {
            Some(Ok(event)) => *last = Some(event),
            Some(Err(e)) if e.is_eof() && !done => break,
            Some(Err(e)) => return Err(e.into()),
            None => break,
        }
    }
    Ok(events.byte_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event(name: &str, hash: &str) -> String {
        format!(r#"{{"Name":"{name}","Hash":"{hash}","Size":"10"}}"#)
    }

    #[test]
    fn test_drain_events_keeps_last_object() {
        let body = format!(
            "{}\n{}\n{}\n",
            event("root/a", "QmA"),
            event("root/b", "QmB"),
            event("root", "QmRoot"),
        );
        let mut last = None;
        drain_events(body.as_bytes(), true, &mut last).unwrap();
        let out = last.unwrap();
        assert_eq!(out.hash, "QmRoot");
        assert_eq!(out.name, "root");
    }

    #[test]
    fn test_drain_events_accepts_concatenated_objects() {
        // No delimiter at all between objects.
        let body = format!("{}{}{}", event("a", "QmA"), event("b", "QmB"), event("c", "QmC"));
        let mut last = None;
        drain_events(body.as_bytes(), true, &mut last).unwrap();
        assert_eq!(last.unwrap().hash, "QmC");
    }

    #[test]
    fn test_drain_events_mid_stream_garbage_is_hard_error() {
        let body = format!("{}\nnot json\n{}", event("a", "QmA"), event("b", "QmB"));
        let mut last = None;
        assert!(matches!(
            drain_events(body.as_bytes(), true, &mut last),
            Err(McsError::Json(_))
        ));
    }

    #[test]
    fn test_drain_events_holds_partial_object_until_stream_ends() {
        let first = event("a", "QmA");
        let second = event("b", "QmB");
        let (head, tail) = second.split_at(7);

        // A chunk boundary in the middle of an object: the partial tail is
        // not consumed and not an error while more bytes may arrive.
        let buf = format!("{first}{head}");
        let mut last = None;
        let consumed = drain_events(buf.as_bytes(), false, &mut last).unwrap();
        assert_eq!(consumed, first.len());
        assert_eq!(last.as_ref().unwrap().hash, "QmA");

        // Once the rest arrives, decoding resumes from the saved offset.
        let buf = format!("{head}{tail}");
        drain_events(buf.as_bytes(), true, &mut last).unwrap();
        assert_eq!(last.unwrap().hash, "QmB");

        // The same partial tail at a completed stream is a hard error.
        let mut last = None;
        assert!(matches!(
            drain_events(head.as_bytes(), true, &mut last),
            Err(McsError::Json(_))
        ));
    }

    #[test]
    fn test_drain_events_empty_stream_yields_nothing() {
        let mut last = None;
        assert_eq!(drain_events(b"", true, &mut last).unwrap(), 0);
        assert!(last.is_none());
    }

    #[tokio::test]
    async fn test_add_sends_exactly_the_set_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Hash":"QmX","Name":"","Size":"4"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let shell = Shell::new(server.uri()).unwrap();
        let options = AddOptions::new()
            .only_hash(true)
            .hash("sha2-256")
            .cid_version(1);
        let hash = shell.add(b"data".to_vec(), &options).await.unwrap();
        assert_eq!(hash, "QmX");

        let requests = server.received_requests().await.unwrap();
        let mut pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("cid-version".to_string(), "1".to_string()),
                ("hash".to_string(), "sha2-256".to_string()),
                ("only-hash".to_string(), "true".to_string()),
            ]
        );
    }

    /// Replaces the random multipart boundary so bodies can be compared.
    fn normalized_body(request: &wiremock::Request) -> String {
        let content_type = request
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        let boundary = content_type.split("boundary=").nth(1).unwrap().to_string();
        String::from_utf8_lossy(&request.body).replace(&boundary, "BOUNDARY")
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn test_add_no_pin_matches_add_with_pin_false_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Hash":"QmX","Name":"","Size":"4"}"#),
            )
            .expect(2)
            .mount(&server)
            .await;

        let shell = Shell::new(server.uri()).unwrap();
        shell.add_no_pin(b"data".to_vec()).await.unwrap();
        shell
            .add(b"data".to_vec(), &AddOptions::new().pin(false))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url.query(), Some("pin=false"));
        assert_eq!(requests[0].url.query(), requests[1].url.query());
        assert_eq!(normalized_body(&requests[0]), normalized_body(&requests[1]));
    }

    #[tokio::test]
    async fn test_add_link_transmits_target_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Hash":"QmLink","Name":"","Size":"0"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let shell = Shell::new(server.uri()).unwrap();
        let hash = shell.add_link("/somewhere/else").await.unwrap();
        assert_eq!(hash, "QmLink");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("application/symlink"));
        assert!(body.contains("/somewhere/else"));
    }

    #[tokio::test]
    async fn test_add_dir_returns_last_streamed_object() {
        let server = MockServer::start().await;
        let stream = format!(
            "{}\n{}\n{}\n",
            event("root/a.txt", "QmA"),
            event("root/sub", "QmSub"),
            event("root", "QmRoot"),
        );
        Mock::given(method("POST"))
            .and(path("/add"))
            .and(query_param("recursive", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stream))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b.txt"), b"beta").unwrap();

        let shell = Shell::new(server.uri()).unwrap();
        let root = shell.add_dir(dir.path()).await.unwrap();
        assert_eq!(root.hash, "QmRoot");
        assert_eq!(root.name, "root");
    }

    #[tokio::test]
    async fn test_add_dir_multipart_names_are_rooted_at_base_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(event("root", "QmRoot")),
            )
            .mount(&server)
            .await;

        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("photos");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("cat.jpg"), b"meow").unwrap();

        let shell = Shell::new(server.uri()).unwrap();
        shell.add_dir(&root).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        // reqwest percent-encodes part filenames, which is how the gateway
        // expects nested paths to arrive.
        assert!(body.contains(r#"filename="photos""#));
        assert!(body.contains(r#"filename="photos%2Fcat.jpg""#));
        assert!(body.contains("application/x-directory"));
    }

    #[tokio::test]
    async fn test_add_dir_missing_path_sends_nothing() {
        let server = MockServer::start().await;

        let shell = Shell::new(server.uri()).unwrap();
        let err = shell.add_dir("/definitely/not/here").await.unwrap_err();
        assert!(matches!(err, McsError::Io(_)));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_dir_mid_stream_decode_error_fails() {
        let server = MockServer::start().await;
        let stream = format!("{}\nbroken\n{}", event("a", "QmA"), event("root", "QmRoot"));
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stream))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"alpha").unwrap();

        let shell = Shell::new(server.uri()).unwrap();
        let err = shell.add_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, McsError::Json(_)));
    }

    #[tokio::test]
    async fn test_add_dir_empty_stream_is_explicit_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"alpha").unwrap();

        let shell = Shell::new(server.uri()).unwrap();
        let err = shell.add_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, McsError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_add_dir_raw_hands_back_undecoded_stream() {
        let server = MockServer::start().await;
        let stream = format!(
            "{}\n{}\n{}\n",
            event("root/a.txt", "QmA"),
            event("root/b.txt", "QmB"),
            event("root", "QmRoot"),
        );
        Mock::given(method("POST"))
            .and(path("/add"))
            .and(query_param("recursive", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stream.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"beta").unwrap();

        let shell = Shell::new(server.uri()).unwrap();
        let response = shell.add_dir_raw(dir.path()).await.unwrap();
        assert!(response.status().is_success());

        // Per-entry decode is the caller's job; the body arrives verbatim.
        let body = response.text().await.unwrap();
        assert_eq!(body, stream);
    }

    #[tokio::test]
    async fn test_add_dir_raw_missing_path_sends_nothing() {
        let server = MockServer::start().await;

        let shell = Shell::new(server.uri()).unwrap();
        let err = shell.add_dir_raw("/definitely/not/here").await.unwrap_err();
        assert!(matches!(err, McsError::Io(_)));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_add_aborts_and_can_be_retried() {
        use std::time::Duration;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Hash":"QmX","Name":"","Size":"4"}"#)
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let shell = Shell::new(server.uri()).unwrap();

        // Dropping the timed-out future must release the in-flight request;
        // repeated cancel cycles should not accumulate anything.
        for _ in 0..3 {
            let attempt = tokio::time::timeout(
                Duration::from_millis(50),
                shell.add(b"data".to_vec(), &AddOptions::new()),
            )
            .await;
            assert!(attempt.is_err(), "expected the timeout to win");
        }
    }
}
