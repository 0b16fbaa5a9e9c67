use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use hyperdrive_api_types_beacon::{
    attestation::{Attestation, AttestationInfo},
    block::{BeaconBlock, SignedBeaconBlockData},
    committee::Committee,
    config::{BeaconConfig, ConfigSpec, DepositContract},
    duties::{ProposerDuty, SyncCommitteeDuty},
    endpoints::{
        BLS_TO_EXECUTION_CHANGES_PATH, CONFIG_SPEC_PATH, DEPOSIT_CONTRACT_PATH, GENESIS_PATH,
        SYNC_STATUS_PATH, VOLUNTARY_EXITS_PATH, attestations_path, beacon_block_path,
        committees_path, finality_checkpoints_path, fork_path, proposer_duties_path,
        sync_duties_path, validators_path,
    },
    error::{BeaconError, FieldError},
    finality::{FinalityCheckpoints, FinalityCheckpointsData},
    id::{ID, ValidatorID},
    responses::{BeaconResponse, BeaconVersionedResponse, DataResponse, DutiesResponse},
    sync::SyncStatus,
    validator::ValidatorData,
};
use hyperdrive_consensus::{
    bls_to_execution_change::SignedBLSToExecutionChange, fork::Fork, genesis::Genesis,
    voluntary_exit::SignedVoluntaryExit,
};
use reqwest::{StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    http_client::{ClientWithBaseUrl, HttpResponse, HttpTransport},
    node::BeaconNode,
    query::QueryConfig,
};

/// Typed client for one beacon node's REST API.
///
/// Any status other than 200 is an error, except on the endpoints where a 404 means the
/// thing asked for does not exist yet.
#[derive(Debug)]
pub struct BeaconApiClient<T = ClientWithBaseUrl> {
    transport: Arc<T>,
    query_config: QueryConfig,
}

impl<T> Clone for BeaconApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            query_config: self.query_config,
        }
    }
}

impl BeaconApiClient {
    pub fn new(
        beacon_api_endpoint: Url,
        request_timeout: Duration,
        query_config: QueryConfig,
    ) -> anyhow::Result<Self> {
        query_config.validate()?;
        Ok(Self::with_transport(
            ClientWithBaseUrl::new(beacon_api_endpoint, request_timeout)?,
            query_config,
        ))
    }
}

impl<T: HttpTransport> BeaconApiClient<T> {
    pub fn with_transport(transport: T, query_config: QueryConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            query_config,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// The body of a 200 response, or `None` on 404.
    async fn get_body_optional(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, BeaconError> {
        let response = self.transport.get(path, cancel).await?;
        match response.status {
            StatusCode::OK => Ok(Some(response.body)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(BeaconError::http_status(path, status, &response.body)),
        }
    }

    async fn get_body(&self, path: &str, cancel: &CancellationToken) -> Result<Vec<u8>, BeaconError> {
        let HttpResponse { status, body } = self.transport.get(path, cancel).await?;
        if status != StatusCode::OK {
            return Err(BeaconError::http_status(path, status, &body));
        }
        Ok(body)
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<R, BeaconError> {
        let body = self.get_body(path, cancel).await?;
        decode_json(path, &body)
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        request: &B,
        cancel: &CancellationToken,
    ) -> Result<R, BeaconError> {
        let HttpResponse { status, body } =
            self.transport.post(path, encode_json(request)?, cancel).await?;
        if status != StatusCode::OK {
            return Err(BeaconError::http_status(path, status, &body));
        }
        decode_json(path, &body)
    }

    /// Posts to a pool endpoint. The response body is only kept for the error.
    async fn submit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        request: &B,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        let HttpResponse { status, body } =
            self.transport.post(path, encode_json(request)?, cancel).await?;
        if status != StatusCode::OK {
            return Err(BeaconError::submission_rejected(path, status, &body));
        }
        Ok(true)
    }
}

fn encode_json<B: Serialize + ?Sized>(request: &B) -> Result<Vec<u8>, BeaconError> {
    serde_json::to_vec(request)
        .map_err(|err| BeaconError::InvalidInput(format!("Failed to encode request: {err}")))
}

fn decode_json<R: DeserializeOwned>(path: &str, body: &[u8]) -> Result<R, BeaconError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| BeaconError::json(path, err, body))?;
    deserializer.end().map_err(|err| {
        BeaconError::decode(path, FieldError::new("response body", err.to_string()), body)
    })?;
    Ok(value)
}

fn join_ids<I: ToString>(ids: &[I]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl<T: HttpTransport + 'static> BeaconNode for BeaconApiClient<T> {
    fn query_config(&self) -> QueryConfig {
        self.query_config
    }

    async fn sync_status(&self, cancel: &CancellationToken) -> Result<SyncStatus, BeaconError> {
        Ok(self
            .get_json::<DataResponse<SyncStatus>>(SYNC_STATUS_PATH, cancel)
            .await?
            .data)
    }

    async fn beacon_config(&self, cancel: &CancellationToken) -> Result<BeaconConfig, BeaconError> {
        let body = self.get_body(CONFIG_SPEC_PATH, cancel).await?;
        let spec = decode_json::<DataResponse<ConfigSpec>>(CONFIG_SPEC_PATH, &body)?.data;
        BeaconConfig::try_from(spec).map_err(|err| BeaconError::decode(CONFIG_SPEC_PATH, err, &body))
    }

    async fn deposit_contract(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DepositContract, BeaconError> {
        Ok(self
            .get_json::<DataResponse<DepositContract>>(DEPOSIT_CONTRACT_PATH, cancel)
            .await?
            .data)
    }

    async fn genesis(&self, cancel: &CancellationToken) -> Result<Genesis, BeaconError> {
        Ok(self
            .get_json::<DataResponse<Genesis>>(GENESIS_PATH, cancel)
            .await?
            .data)
    }

    async fn finality_checkpoints(
        &self,
        state_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<FinalityCheckpoints, BeaconError> {
        let path = finality_checkpoints_path(state_id);
        Ok(self
            .get_json::<BeaconResponse<FinalityCheckpointsData>>(&path, cancel)
            .await?
            .data
            .into())
    }

    async fn fork(&self, state_id: &ID, cancel: &CancellationToken) -> Result<Fork, BeaconError> {
        let path = fork_path(state_id);
        Ok(self.get_json::<BeaconResponse<Fork>>(&path, cancel).await?.data)
    }

    async fn committees(
        &self,
        state_id: &ID,
        epoch: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Committee>, BeaconError> {
        let mut path = committees_path(state_id);
        if let Some(epoch) = epoch {
            path.push_str(&format!("?epoch={epoch}"));
        }
        Ok(self
            .get_json::<BeaconResponse<Vec<Committee>>>(&path, cancel)
            .await?
            .data)
    }

    async fn validators(
        &self,
        state_id: &ID,
        ids: &[ValidatorID],
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidatorData>, BeaconError> {
        if ids.len() > self.query_config.batch_size {
            return Err(BeaconError::InvalidInput(format!(
                "{} validator ids exceed the batch size of {}",
                ids.len(),
                self.query_config.batch_size
            )));
        }

        let mut path = validators_path(state_id);
        if !ids.is_empty() {
            path.push_str(&format!("?id={}", join_ids(ids)));
        }

        match self.get_body_optional(&path, cancel).await? {
            Some(body) => Ok(decode_json::<BeaconResponse<Vec<ValidatorData>>>(&path, &body)?.data),
            None => {
                debug!("No validators found at state {state_id}");
                Ok(vec![])
            }
        }
    }

    async fn attestations(
        &self,
        block_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<AttestationInfo>>, BeaconError> {
        let path = attestations_path(block_id);
        let Some(body) = self.get_body_optional(&path, cancel).await? else {
            return Ok(None);
        };
        let attestations = decode_json::<BeaconResponse<Vec<Attestation>>>(&path, &body)?.data;
        Ok(Some(
            attestations.into_iter().map(AttestationInfo::from).collect(),
        ))
    }

    async fn beacon_block(
        &self,
        block_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<Option<BeaconBlock>, BeaconError> {
        let path = beacon_block_path(block_id);
        let Some(body) = self.get_body_optional(&path, cancel).await? else {
            return Ok(None);
        };
        let block = decode_json::<BeaconVersionedResponse<SignedBeaconBlockData>>(&path, &body)?;
        Ok(Some(block.data.into()))
    }

    async fn validator_sync_duties(
        &self,
        indices: &[u64],
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<HashMap<u64, bool>, BeaconError> {
        let request: Vec<String> = indices.iter().map(ToString::to_string).collect();
        let duties = self
            .post_json::<_, DataResponse<Vec<SyncCommitteeDuty>>>(
                &sync_duties_path(epoch),
                &request,
                cancel,
            )
            .await?
            .data;

        let mut sync_duties = HashMap::with_capacity(indices.len());
        for index in indices {
            let in_committee = duties.iter().any(|duty| duty.validator_index == *index);
            sync_duties.insert(*index, in_committee);
        }
        Ok(sync_duties)
    }

    async fn validator_proposer_duties(
        &self,
        indices: &[u64],
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<HashMap<u64, u64>, BeaconError> {
        let duties = self
            .get_json::<DutiesResponse<ProposerDuty>>(&proposer_duties_path(epoch), cancel)
            .await?
            .data;

        let mut proposer_duties = HashMap::with_capacity(indices.len());
        for index in indices {
            let proposals = proposer_duties.entry(*index).or_insert(0);
            // Counted once per index no matter how many slots it proposes in.
            if duties.iter().any(|duty| duty.validator_index == *index) {
                *proposals = 1;
            }
        }
        Ok(proposer_duties)
    }

    async fn submit_voluntary_exit(
        &self,
        exit: &SignedVoluntaryExit,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        let accepted = self.submit(VOLUNTARY_EXITS_PATH, exit, cancel).await?;
        info!(
            "Voluntary exit for validator {} at epoch {} accepted by {}",
            exit.message.validator_index,
            exit.message.epoch,
            self.base_url()
        );
        Ok(accepted)
    }

    async fn submit_bls_to_execution_change(
        &self,
        change: &SignedBLSToExecutionChange,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        let accepted = self
            .submit(
                BLS_TO_EXECUTION_CHANGES_PATH,
                std::slice::from_ref(change),
                cancel,
            )
            .await?;
        info!(
            "BLS to execution change for validator {} accepted by {}",
            change.message.validator_index,
            self.base_url()
        );
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hyperdrive_api_types_beacon::error::{TransportError, TransportErrorKind};

    use super::*;

    /// Serves canned responses keyed by path and records what was asked for.
    struct CannedTransport {
        base_url: Url,
        responses: HashMap<String, (StatusCode, String)>,
        requests: Mutex<Vec<(String, Option<String>)>>,
    }

    impl CannedTransport {
        fn new(responses: &[(&str, StatusCode, &str)]) -> Self {
            Self {
                base_url: Url::parse("http://localhost:5052").unwrap(),
                responses: responses
                    .iter()
                    .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                    .collect(),
                requests: Mutex::new(vec![]),
            }
        }

        fn respond(&self, path: &str) -> Result<HttpResponse, BeaconError> {
            match self.responses.get(path) {
                Some((status, body)) => Ok(HttpResponse::new(*status, body.as_bytes())),
                None => Err(TransportError::new(TransportErrorKind::Connect, "connection refused").into()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        fn base_url(&self) -> &Url {
            &self.base_url
        }

        async fn get(
            &self,
            path: &str,
            _cancel: &CancellationToken,
        ) -> Result<HttpResponse, BeaconError> {
            self.requests.lock().unwrap().push((path.to_string(), None));
            self.respond(path)
        }

        async fn post(
            &self,
            path: &str,
            body: Vec<u8>,
            _cancel: &CancellationToken,
        ) -> Result<HttpResponse, BeaconError> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), Some(String::from_utf8(body).unwrap())));
            self.respond(path)
        }
    }

    fn client(responses: &[(&str, StatusCode, &str)]) -> BeaconApiClient<CannedTransport> {
        BeaconApiClient::with_transport(CannedTransport::new(responses), QueryConfig::default())
    }

    #[tokio::test]
    async fn test_sync_status() {
        let client = client(&[(
            SYNC_STATUS_PATH,
            StatusCode::OK,
            r#"{"data":{"head_slot":"100","sync_distance":"25","is_syncing":true,"is_optimistic":false,"el_offline":false}}"#,
        )]);

        let status = client.sync_status(&CancellationToken::new()).await.unwrap();
        assert!(status.is_syncing);
        assert!((status.progress() - 0.8).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_non_200_is_http_status_error() {
        let client = client(&[(SYNC_STATUS_PATH, StatusCode::INTERNAL_SERVER_ERROR, "internal")]);

        let err = client.sync_status(&CancellationToken::new()).await.unwrap_err();
        match err {
            BeaconError::HttpStatus {
                status_code, body, ..
            } => {
                assert_eq!(status_code, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "internal");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_bad_integer_is_decode_error_with_body() {
        let body = r#"{"data":{"head_slot":"one hundred","sync_distance":"25","is_syncing":true}}"#;
        let client = client(&[(SYNC_STATUS_PATH, StatusCode::OK, body)]);

        let err = client.sync_status(&CancellationToken::new()).await.unwrap_err();
        assert!(!err.is_disconnection());
        match err {
            BeaconError::Decode {
                endpoint,
                field,
                message,
                body: raw,
            } => {
                assert_eq!(endpoint, SYNC_STATUS_PATH);
                assert_eq!(field, "data.head_slot");
                assert!(message.contains("invalid digit"), "{message}");
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_validator_status_names_its_path() {
        let client = client(&[(
            "/eth/v1/beacon/states/head/validators?id=1",
            StatusCode::OK,
            r#"{"execution_optimistic":false,"finalized":false,"data":[{"index":"1","balance":"32000000000","status":"active_sideways","validator":{}}]}"#,
        )]);

        let err = client
            .validators(&ID::Head, &[ValidatorID::Index(1)], &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            BeaconError::Decode { field, message, .. } => {
                assert_eq!(field, "data[0].status");
                assert!(message.contains("active_sideways"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported_against_the_whole_body() {
        let client = client(&[(SYNC_STATUS_PATH, StatusCode::OK, "not json")]);

        let err = client.sync_status(&CancellationToken::new()).await.unwrap_err();
        match err {
            BeaconError::Decode { field, .. } => assert_eq!(field, "response body"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_beacon_config_mismatch_is_decode_error() {
        let client = client(&[(
            CONFIG_SPEC_PATH,
            StatusCode::OK,
            r#"{"data":{"SECONDS_PER_SLOT":"12","SLOTS_PER_EPOCH":"32","EPOCHS_PER_SYNC_COMMITTEE_PERIOD":"256","CAPELLA_FORK_VERSION":"0x03000000","SECONDS_PER_EPOCH":"400"}}"#,
        )]);

        let err = client.beacon_config(&CancellationToken::new()).await.unwrap_err();
        match err {
            BeaconError::Decode { field, .. } => assert_eq!(field, "data.SECONDS_PER_EPOCH"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_attestations_not_found() {
        let client = client(&[(
            "/eth/v1/beacon/blocks/head/attestations",
            StatusCode::NOT_FOUND,
            r#"{"code":404,"message":"NOT_FOUND: beacon block at slot 12"}"#,
        )]);

        let attestations = client
            .attestations(&ID::Head, &CancellationToken::new())
            .await
            .unwrap();
        assert!(attestations.is_none());
    }

    #[tokio::test]
    async fn test_beacon_block_pre_merge() {
        let client = client(&[(
            "/eth/v2/beacon/blocks/12",
            StatusCode::OK,
            r#"{"version":"phase0","execution_optimistic":false,"finalized":true,"data":{"message":{"slot":"12","proposer_index":"7","parent_root":"0x0000000000000000000000000000000000000000000000000000000000000001","state_root":"0x0000000000000000000000000000000000000000000000000000000000000002","body":{"attestations":[]}},"signature":"0x000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000"}}"#,
        )]);

        let block = client
            .beacon_block(&ID::Slot(12), &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(block.slot, 12);
        assert_eq!(block.proposer_index, 7);
        assert!(!block.has_execution_payload);
        assert!(block.attestations.is_empty());
    }

    #[tokio::test]
    async fn test_validators_rejects_oversized_batch_before_io() {
        let client = BeaconApiClient::with_transport(
            CannedTransport::new(&[]),
            QueryConfig {
                batch_size: 2,
                concurrency: 1,
            },
        );
        let ids = [1u64, 2, 3].map(ValidatorID::Index);

        let err = client
            .validators(&ID::Head, &ids, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BeaconError::InvalidInput(_)));
        assert!(client.transport().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validators_query_string_and_not_found() {
        let client = client(&[(
            "/eth/v1/beacon/states/head/validators?id=1,2",
            StatusCode::NOT_FOUND,
            "",
        )]);
        let ids = [1u64, 2].map(ValidatorID::Index);

        let validators = client
            .validators(&ID::Head, &ids, &CancellationToken::new())
            .await
            .unwrap();
        assert!(validators.is_empty());
    }

    #[tokio::test]
    async fn test_proposer_duties_are_membership_counts() {
        let duty = |index: u64, slot: u64| {
            format!(
                r#"{{"pubkey":"0x93247f2209abcacf57b75a51dafae777f9dd38bc7053d1af526f220a7489a6d3a2753e5f3e8b1cfe39b56f43611df74a","validator_index":"{index}","slot":"{slot}"}}"#
            )
        };
        let body = format!(
            r#"{{"dependent_root":"0x0000000000000000000000000000000000000000000000000000000000000000","execution_optimistic":false,"data":[{},{},{}]}}"#,
            duty(5, 320),
            duty(5, 321),
            duty(9, 322)
        );
        let client = client(&[("/eth/v1/validator/duties/proposer/10", StatusCode::OK, &body)]);

        let duties = client
            .validator_proposer_duties(&[5, 9, 11], 10, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(duties.len(), 3);
        assert_eq!(duties[&5], 1);
        assert_eq!(duties[&9], 1);
        assert_eq!(duties[&11], 0);
    }

    #[tokio::test]
    async fn test_sync_duties_post_indices_as_strings() {
        let client = client(&[(
            "/eth/v1/validator/duties/sync/10",
            StatusCode::OK,
            r#"{"execution_optimistic":false,"data":[{"pubkey":"0x93247f2209abcacf57b75a51dafae777f9dd38bc7053d1af526f220a7489a6d3a2753e5f3e8b1cfe39b56f43611df74a","validator_index":"5","validator_sync_committee_indices":["0","13"]}]}"#,
        )]);

        let duties = client
            .validator_sync_duties(&[5, 6], 10, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(duties, HashMap::from([(5, true), (6, false)]));

        let requests = client.transport().requests.lock().unwrap();
        assert_eq!(requests[0].1.as_deref(), Some(r#"["5","6"]"#));
    }

    #[tokio::test]
    async fn test_rejected_submission() {
        let client = client(&[(
            BLS_TO_EXECUTION_CHANGES_PATH,
            StatusCode::BAD_REQUEST,
            r#"{"code":400,"message":"Invalid BLS to execution change"}"#,
        )]);
        let change = SignedBLSToExecutionChange::default();

        let err = client
            .submit_bls_to_execution_change(&change, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            BeaconError::SubmissionRejected {
                status_code, body, ..
            } => {
                assert_eq!(status_code, StatusCode::BAD_REQUEST);
                assert!(body.contains("Invalid BLS to execution change"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let requests = client.transport().requests.lock().unwrap();
        let posted: serde_json::Value =
            serde_json::from_str(requests[0].1.as_deref().unwrap()).unwrap();
        assert_eq!(posted.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_deposit_contract() {
        let client = client(&[(
            DEPOSIT_CONTRACT_PATH,
            StatusCode::OK,
            r#"{"data":{"chain_id":"1","address":"0x00000000219ab540356cbb839cbe05303d7705fa"}}"#,
        )]);

        let contract = client
            .deposit_contract(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(contract.chain_id, 1);
        assert_eq!(
            contract.address,
            alloy_primitives::address!("0x00000000219ab540356cbb839cbe05303d7705fa")
        );
    }

    const FINALITY_BODY: &str = r#"{"execution_optimistic":false,"finalized":false,"data":{"previous_justified":{"epoch":"9","root":"0x0000000000000000000000000000000000000000000000000000000000000009"},"current_justified":{"epoch":"10","root":"0x000000000000000000000000000000000000000000000000000000000000000a"},"finalized":{"epoch":"8","root":"0x0000000000000000000000000000000000000000000000000000000000000008"}}}"#;

    #[tokio::test]
    async fn test_beacon_head_combines_finality_and_wall_clock() {
        let client = client(&[
            (
                GENESIS_PATH,
                StatusCode::OK,
                r#"{"data":{"genesis_time":"1606824023","genesis_validators_root":"0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95","genesis_fork_version":"0x00000000"}}"#,
            ),
            (
                CONFIG_SPEC_PATH,
                StatusCode::OK,
                r#"{"data":{"SECONDS_PER_SLOT":"12","SLOTS_PER_EPOCH":"32","EPOCHS_PER_SYNC_COMMITTEE_PERIOD":"256","CAPELLA_FORK_VERSION":"0x03000000"}}"#,
            ),
            ("/eth/v1/beacon/states/head/finality_checkpoints", StatusCode::OK, FINALITY_BODY),
        ]);

        let head = client.beacon_head(&CancellationToken::new()).await.unwrap();
        assert_eq!(head.finalized_epoch, 8);
        assert_eq!(head.justified_epoch, 10);
        assert_eq!(head.previous_justified_epoch, 9);
        // Mainnet genesis is in the past, so the wall clock is well past epoch 0.
        assert!(head.epoch > 0);
    }

    #[tokio::test]
    async fn test_fork_at_finalized_state() {
        let client = client(&[(
            "/eth/v1/beacon/states/finalized/fork",
            StatusCode::OK,
            r#"{"data":{"previous_version":"0x03000000","current_version":"0x04000000","epoch":"269568"}}"#,
        )]);

        let fork = client
            .fork(&ID::Finalized, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(fork.epoch, 269568);
        assert_eq!(fork.current_version, alloy_primitives::fixed_bytes!("0x04000000"));
    }

    #[tokio::test]
    async fn test_committees_with_epoch_filter() {
        let client = client(&[(
            "/eth/v1/beacon/states/head/committees?epoch=10",
            StatusCode::OK,
            r#"{"data":[{"index":"0","slot":"320","validators":["3","1","4"]}]}"#,
        )]);

        let committees = client
            .committees(&ID::Head, Some(10), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            committees,
            vec![Committee {
                index: 0,
                slot: 320,
                validators: vec![3, 1, 4],
            }]
        );

        let err = client
            .committees(&ID::Head, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_disconnection());
    }
}
