use crate::*;
use alloy_primitives::{address, Address, Bytes, U256};
use assert_matches::assert_matches;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use ornode_chain::{
    test_utils::{contracts, token_id, MockChain},
    Mint,
};
use ornode_primitives::{
    ErrorKind, GetProposalsSpec, ProposalContent, ProposalSubmission, PutProposalStatus,
};
use ornode_rpc_api::{OrnodeAdminApiClient, OrnodeApiClient, OrnodeClientError};
use ornode_storage::MemoryOrDb;
use ornode_sync::ProposalSyncService;
use std::sync::Arc;

const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");

async fn start_server(chain: &MockChain, enable_admin: bool) -> (RpcServerHandle, HttpClient) {
    ornode_tracing::init_test_tracing();
    let config = RpcConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        enable_admin,
        ..Default::default()
    };
    let service = ProposalSyncService::new(
        Arc::new(MemoryOrDb::new()),
        chain.clone(),
        contracts(),
        config.pages,
    );
    let handle = launch(&config, Arc::new(service)).await.unwrap();
    let client = HttpClientBuilder::default()
        .build(format!("http://{}", handle.local_addr()))
        .unwrap();
    (handle, client)
}

fn content(memo: &'static [u8]) -> ProposalContent {
    let mint = Mint { token_id: token_id(2, ALICE), amount: U256::from(7) };
    contracts().account_content(mint, Bytes::from_static(memo))
}

#[tokio::test(flavor = "multi_thread")]
async fn submits_and_reads_proposals() {
    let chain = MockChain::default();
    let (handle, client) = start_server(&chain, false).await;
    let content = content(b"rpc");
    let id = content.id();
    chain.add_proposal(id, 77);

    let submission = ProposalSubmission { id, content: content.clone(), attachment: None };
    let status = OrnodeApiClient::put_proposal(&client, submission.clone()).await.unwrap();
    assert_eq!(status, PutProposalStatus::ProposalStored);
    let status = OrnodeApiClient::put_proposal(&client, submission).await.unwrap();
    assert_eq!(status, PutProposalStatus::ProposalExists);

    let proposal = OrnodeApiClient::get_proposal(&client, id).await.unwrap();
    assert_eq!(proposal.content, Some(content));
    assert_eq!(proposal.create_ts, Some(77));

    let page = OrnodeApiClient::get_proposals(&client, None).await.unwrap();
    assert_eq!(page.len(), 1);
    let spec = GetProposalsSpec { before: Some(77), ..Default::default() };
    assert!(OrnodeApiClient::get_proposals(&client, Some(spec)).await.unwrap().is_empty());

    assert_eq!(OrnodeApiClient::get_period_num(&client).await.unwrap(), 0);
    assert_eq!(OrnodeApiClient::get_chain_state(&client, id).await.unwrap().create_time, 77);
    assert!(OrnodeApiClient::get_votes(&client, None).await.unwrap().is_empty());

    assert!(handle.stop());
    handle.stopped().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn reports_error_kinds() {
    let chain = MockChain::default();
    let (_handle, client) = start_server(&chain, false).await;
    let content = content(b"missing");

    let err = OrnodeApiClient::get_proposal(&client, content.id()).await.unwrap_err();
    assert_eq!(OrnodeClientError::from(err).kind(), Some(ErrorKind::ProposalNotFound));

    let submission = ProposalSubmission { id: content.id(), content, attachment: None };
    let err = OrnodeApiClient::put_proposal(&client, submission.clone()).await.unwrap_err();
    assert_eq!(OrnodeClientError::from(err).kind(), Some(ErrorKind::ProposalNotCreated));

    let mismatched = ProposalSubmission { id: Default::default(), ..submission };
    let err = OrnodeApiClient::put_proposal(&client, mismatched).await.unwrap_err();
    assert_eq!(OrnodeClientError::from(err).kind(), Some(ErrorKind::ProposalInvalid));

    let err = OrnodeApiClient::get_award(&client, U256::from(1)).await.unwrap_err();
    assert_eq!(OrnodeClientError::from(err).kind(), Some(ErrorKind::TokenNotFound));
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_namespace_is_opt_in() {
    let chain = MockChain::default();
    let id = content(b"admin").id();
    chain.add_proposal(id, 5);

    let (_handle, client) = start_server(&chain, false).await;
    let err = OrnodeAdminApiClient::remove_proposal(&client, id).await.unwrap_err();
    assert_matches!(
        OrnodeClientError::from(err),
        OrnodeClientError::UnknownErrResponse { code: -32601, .. }
    );

    let (_handle, client) = start_server(&chain, true).await;
    let err = OrnodeAdminApiClient::remove_proposal(&client, id).await.unwrap_err();
    assert_eq!(OrnodeClientError::from(err).kind(), Some(ErrorKind::ProposalNotFound));

    let submission = ProposalSubmission { id, content: content(b"admin"), attachment: None };
    OrnodeApiClient::put_proposal(&client, submission).await.unwrap();
    OrnodeAdminApiClient::remove_proposal(&client, id).await.unwrap();
    assert!(OrnodeApiClient::get_proposals(&client, None).await.unwrap().is_empty());
    assert!(OrnodeApiClient::get_proposal(&client, id).await.unwrap().removed);
}
