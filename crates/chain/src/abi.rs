//! Solidity bindings of the contracts the node reads from.
#![allow(missing_docs, unreachable_pub, clippy::too_many_arguments)]

use alloy_sol_types::sol;

sol! {
    /// Timed-vote execution registry.
    #[sol(rpc)]
    contract Orec {
        event ProposalCreated(bytes32 indexed propId);
        event WeightedVoteIndexed(
            bytes32 indexed propId,
            address indexed voter,
            uint8 vote,
            uint256 weight
        );
        event Executed(bytes32 indexed propId, bytes retVal);
        event ExecutionFailed(bytes32 indexed propId, bytes retVal);
        event Signal(uint8 indexed signalType, bytes data);

        function proposals(bytes32 propId)
            external
            view
            returns (uint256 createTime, uint256 yesWeight, uint256 noWeight, uint8 status);
        function getStage(bytes32 propId) external view returns (uint8);
        function getVoteStatus(bytes32 propId) external view returns (uint8);
        function voteLen() external view returns (uint64);
        function vetoLen() external view returns (uint64);

        function signal(uint8 signalType, bytes calldata data) external;
    }
}

sol! {
    struct MintRequest {
        uint256 id;
        uint256 value;
    }

    /// Reputation token ledger. Only the calls Orec proposals execute are bound.
    contract Respect1155 {
        function mintRespect(MintRequest request, bytes data) external;
        function mintRespectGroup(MintRequest[] requests, bytes data) external;
        function burnRespect(uint256 tokenId, bytes data) external;
    }
}
