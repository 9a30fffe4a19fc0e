use spoke_config::ConfigLoader;
use spoke_types::ChainFamily;
use std::path::PathBuf;

fn example_path() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/spoke.toml")
}

#[test]
fn test_shipped_config_covers_every_family() {
	let contents = std::fs::read_to_string(example_path()).unwrap();
	let config = ConfigLoader::from_toml(&contents).unwrap();

	for family in ChainFamily::ALL {
		assert!(
			config.spokes.values().any(|spoke| spoke.family == family),
			"no {} spoke in the shipped config",
			family
		);
	}
	assert_eq!(config.spoke("sonic").unwrap().chain_id, config.hub.chain_id);
}

#[test]
fn test_shipped_config_rpc_override() {
	let contents = std::fs::read_to_string(example_path()).unwrap();
	let config = ConfigLoader::from_toml_with_env(
		&contents,
		vec![(
			"SPOKE_RPC_URL_ARBITRUM".to_string(),
			"http://localhost:8545".to_string(),
		)],
	)
	.unwrap();

	assert_eq!(config.spoke("arbitrum").unwrap().rpc_url, "http://localhost:8545");
	assert_eq!(config.spoke("sui").unwrap().rpc_url, "https://fullnode.mainnet.sui.io");
}
