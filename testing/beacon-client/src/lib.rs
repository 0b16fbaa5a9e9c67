//! An in-memory beacon node for exercising the client stack without a network.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy_primitives::{B256, aliases::B32};
use async_trait::async_trait;
use blst::min_pk::SecretKey;
use hyperdrive_api_types_beacon::{
    error::{BeaconError, TransportError, TransportErrorKind},
    id::ValidatorID,
    responses::BeaconResponse,
    validator::{ValidatorData, ValidatorStatus},
};
use hyperdrive_beacon_client::{
    BeaconApiClient, QueryConfig,
    http_client::{HttpResponse, HttpTransport},
};
use hyperdrive_bls::{BLSSignature, PubKey};
use hyperdrive_consensus::{constants::FAR_FUTURE_EPOCH, validator::Validator};
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// The identifiers of a `validators` request.
    pub fn validator_ids(&self) -> Vec<String> {
        self.query
            .as_deref()
            .and_then(|query| query.strip_prefix("id="))
            .map(|ids| ids.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}

pub type Handler =
    Arc<dyn Fn(&RecordedRequest) -> Result<(StatusCode, String), TransportError> + Send + Sync>;

/// [HttpTransport] that serves requests from registered handlers.
///
/// Every request is recorded before it is answered. A configured delay is spent while the
/// request counts as in flight, and cancelling the caller's token during the delay fails the
/// request with a cancelled transport error. Unknown paths answer 404.
pub struct MockBeaconTransport {
    base_url: Url,
    routes: HashMap<(Method, String), Handler>,
    delay: Duration,
    requests: Mutex<Vec<RecordedRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockBeaconTransport {
    fn default() -> Self {
        Self::new("http://localhost:5052")
    }
}

impl MockBeaconTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: Url::parse(base_url).expect("mock base url must be valid"),
            routes: HashMap::new(),
            delay: Duration::ZERO,
            requests: Mutex::new(vec![]),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn route<F>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<(StatusCode, String), TransportError>
            + Send
            + Sync
            + 'static,
    {
        self.routes
            .insert((method, path.to_string()), Arc::new(handler));
        self
    }

    /// Always answers `path` with `status` and `body`.
    pub fn respond(self, method: Method, path: &str, status: StatusCode, body: &str) -> Self {
        let body = body.to_string();
        self.route(method, path, move |_| Ok((status, body.clone())))
    }

    /// Fails every request to `path` before it reaches the server.
    pub fn fail(self, method: Method, path: &str, kind: TransportErrorKind) -> Self {
        self.route(method, path, move |_| {
            Err(TransportError::new(kind, format!("injected {kind} failure")))
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn handle(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError> {
        if cancel.is_cancelled() {
            return Err(TransportError::cancelled().into());
        }

        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (path, None),
        };
        let request = RecordedRequest {
            method,
            path: path.to_string(),
            query,
            body: body.map(|body| String::from_utf8_lossy(&body).into_owned()),
        };
        self.requests.lock().push(request.clone());

        let _in_flight = InFlight::enter(&self.in_flight, &self.max_in_flight);
        if !self.delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::cancelled().into()),
                _ = tokio::time::sleep(self.delay) => {}
            }
        }

        let Some(handler) = self.routes.get(&(method, request.path.clone())) else {
            return Ok(HttpResponse::new(
                StatusCode::NOT_FOUND,
                r#"{"code":404,"message":"NOT_FOUND"}"#,
            ));
        };
        let (status, body) = handler(&request)?;
        Ok(HttpResponse::new(status, body.into_bytes()))
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpTransport for MockBeaconTransport {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError> {
        self.handle(Method::Get, path, None, cancel).await
    }

    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError> {
        self.handle(Method::Post, path, Some(body), cancel).await
    }
}

pub fn mock_client(transport: MockBeaconTransport) -> BeaconApiClient<MockBeaconTransport> {
    BeaconApiClient::with_transport(transport, QueryConfig::default())
}

/// Deterministic, valid BLS public keys.
pub fn generate_pubkeys(count: usize) -> Vec<PubKey> {
    (0..count)
        .map(|i| {
            let mut ikm = [0u8; 32];
            ikm[..8].copy_from_slice(&(i as u64).to_le_bytes());
            ikm[31] = 0xff;
            let secret_key = SecretKey::key_gen(&ikm, &[]).expect("ikm is 32 bytes");
            PubKey::try_from(secret_key.sk_to_pk()).expect("generated key is valid")
        })
        .collect()
}

pub fn active_validator(index: u64, pubkey: PubKey) -> ValidatorData {
    ValidatorData::new(
        index,
        32_000_000_000 + index,
        ValidatorStatus::ActiveOngoing,
        Validator {
            pubkey,
            withdrawal_credentials: B256::with_last_byte(1),
            effective_balance: 32_000_000_000,
            slashed: false,
            activation_eligibility_epoch: 0,
            activation_epoch: 0,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
        },
    )
}

/// Answers `validators` requests from `validators`, like a node whose state holds exactly
/// those records.
pub fn validators_route(
    validators: Vec<ValidatorData>,
) -> impl Fn(&RecordedRequest) -> Result<(StatusCode, String), TransportError> + Send + Sync + 'static
{
    move |request| {
        let ids = request
            .validator_ids()
            .iter()
            .filter_map(|id| ValidatorID::from_str(id).ok())
            .collect::<Vec<_>>();
        let found = validators
            .iter()
            .filter(|data| ids.iter().any(|id| id.matches(data)))
            .cloned()
            .collect::<Vec<_>>();
        let body = serde_json::to_string(&BeaconResponse::new(found))
            .map_err(|err| TransportError::new(TransportErrorKind::Request, err.to_string()))?;
        Ok((StatusCode::OK, body))
    }
}

pub fn sync_status_body(head_slot: u64, sync_distance: u64, is_syncing: bool) -> String {
    format!(
        r#"{{"data":{{"head_slot":"{head_slot}","sync_distance":"{sync_distance}","is_syncing":{is_syncing},"is_optimistic":false,"el_offline":false}}}}"#
    )
}

pub fn genesis_body(genesis_validators_root: B256, genesis_fork_version: B32) -> String {
    format!(
        r#"{{"data":{{"genesis_time":"1606824023","genesis_validators_root":"{genesis_validators_root}","genesis_fork_version":"{genesis_fork_version}"}}}}"#
    )
}

pub fn config_spec_body(capella_fork_version: B32) -> String {
    format!(
        r#"{{"data":{{"PRESET_BASE":"mainnet","SECONDS_PER_SLOT":"12","SLOTS_PER_EPOCH":"32","SECONDS_PER_EPOCH":"384","EPOCHS_PER_SYNC_COMMITTEE_PERIOD":"256","CAPELLA_FORK_VERSION":"{capella_fork_version}"}}}}"#
    )
}

/// Returns the same signature for every root and records what it was asked to sign.
#[derive(Default)]
pub struct FixedSigner {
    pub signature: BLSSignature,
    pub signed: Mutex<Vec<(PubKey, B256)>>,
}

impl FixedSigner {
    pub fn new(signature: BLSSignature) -> Self {
        Self {
            signature,
            signed: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl hyperdrive_validator_beacon::signer::WalletSigner for FixedSigner {
    async fn sign(&self, pubkey: &PubKey, signing_root: B256) -> anyhow::Result<BLSSignature> {
        self.signed.lock().push((pubkey.clone(), signing_root));
        Ok(self.signature.clone())
    }
}
