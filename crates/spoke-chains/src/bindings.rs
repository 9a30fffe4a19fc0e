//! Solidity interfaces of the spoke and hub contracts.

use alloy::sol;

sol! {
	/// Spoke asset manager: escrows assets and emits the deposit message the
	/// relay credits on the hub.
	interface IAssetManager {
		function transfer(address token, bytes to, uint256 amount, bytes data) external payable;
	}

	/// Spoke messaging endpoint.
	interface IConnection {
		function sendMessage(uint256 dstChainId, bytes dstAddress, bytes payload) external;
	}

	interface IERC20 {
		function transfer(address to, uint256 amount) external returns (bool);
		function balanceOf(address account) external view returns (uint256);
	}

	/// Hub wallet factory deriving one abstracted wallet per spoke account.
	interface IWalletFactory {
		function getDeployedAddress(uint256 chainId, bytes user) external view returns (address);
	}

	/// Abstracted wallet on the hub.
	interface IHubWallet {
		function execute(bytes payload) external;
	}
}
