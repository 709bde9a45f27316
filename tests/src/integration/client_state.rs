//! # Client-Side State
//!
//! Whole views travel in sealed tokens; nothing is kept in the session.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use shared_types::{ManualTimeSource, SerializedView, Session, TimeSource};
    use vs_01_state_codec::{params as codec_params, CodecConfig, CodecError};
    use vs_02_state_cache::{
        params, ClientStateConfig, SerializedViewCollection, StateCache, StateCacheError,
        StateCacheService, StateConfig, StateSavingMethod,
    };
    use vs_03_scope_storage::ScopeConfig;

    use crate::integration::support::{init_tracing, request};

    const MINUTE: u64 = 60_000;
    const SECRET: &str = "ERERERERERERERERERERERERERERERERERERERERERE=";
    const MAC_SECRET: &str = "IiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiI=";

    fn page(view_id: &str) -> SerializedView {
        SerializedView::new(view_id)
            .with_tree_structure(vec![7; 256])
            .with_component_state("f:name", b"alice".to_vec())
            .with_component_state("f:email", b"alice@example.org".to_vec())
    }

    fn client(config: StateConfig, time: Arc<dyn TimeSource>) -> StateCacheService {
        init_tracing();
        StateCacheService::new(
            config.with_state_saving_method(StateSavingMethod::Client),
            None,
            time,
        )
        .unwrap()
    }

    fn keyed_codec() -> CodecConfig {
        CodecConfig::default()
            .with_secret(SECRET)
            .with_mac_secret(MAC_SECRET)
    }

    #[test]
    fn test_roundtrip_keeps_session_empty() {
        let service = client(StateConfig::default(), Arc::new(ManualTimeSource::new(0)));
        let session = Session::new_shared();

        let token = service
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap();
        let restored = service
            .restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &token)
            .unwrap()
            .unwrap();

        assert_eq!(*restored, page("/a.xhtml"));
        assert!(session.get::<SerializedViewCollection>().is_none());
    }

    #[test]
    fn test_token_expires_after_timeout() {
        let time = Arc::new(ManualTimeSource::new(10_000));
        let service = client(
            StateConfig::default().with_client(ClientStateConfig::default().with_timeout_minutes(30)),
            time.clone(),
        );
        let session = Session::new_shared();
        let token = service
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap();

        time.advance(29 * MINUTE);
        assert!(service
            .restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &token)
            .unwrap()
            .is_some());

        time.advance(2 * MINUTE);
        assert!(service
            .restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &token)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_cross_view_token_rejected() {
        let service = client(StateConfig::default(), Arc::new(ManualTimeSource::new(0)));
        let session = Session::new_shared();
        let token = service
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap();

        assert!(service
            .restore_serialized_view(&mut request(&session, "/b.xhtml"), "/b.xhtml", &token)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_tampered_token_is_integrity_error() {
        let service = client(
            StateConfig::default().with_codec(keyed_codec().with_compression(true)),
            Arc::new(ManualTimeSource::new(0)),
        );
        let session = Session::new_shared();
        let token = service
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap();

        let mut bytes = token.into_bytes();
        let middle = bytes.len() / 2;
        bytes[middle] = if bytes[middle] == b'A' { b'B' } else { b'A' };
        let forged = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            service.restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &forged),
            Err(StateCacheError::Codec(CodecError::Integrity(_)))
        ));
    }

    #[test]
    fn test_nodes_sharing_secrets_read_each_others_tokens() {
        let time: Arc<dyn TimeSource> = Arc::new(ManualTimeSource::new(0));
        let config = StateConfig::default().with_codec(keyed_codec());
        let node_a = client(config.clone(), Arc::clone(&time));
        let node_b = client(config, Arc::clone(&time));
        let stranger = client(StateConfig::default(), time);
        let session = Session::new_shared();

        let token = node_a
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap();

        assert!(node_b
            .restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &token)
            .unwrap()
            .is_some());
        assert!(stranger
            .restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &token)
            .is_err());
    }

    #[test]
    fn test_configuration_from_parameters() {
        let parameters: HashMap<String, String> = [
            (params::STATE_SAVING_METHOD, "client"),
            (params::CLIENT_VIEW_STATE_TIMEOUT, "1"),
            (codec_params::ALGORITHM, "XChaCha20"),
            (codec_params::ALGORITHM_PARAMETERS, "NoPadding"),
            (codec_params::SECRET, SECRET),
            (codec_params::MAC_SECRET, MAC_SECRET),
            (codec_params::COMPRESS_STATE_IN_CLIENT, "true"),
            ("VS_NUMBER_OF_FLOW_CLIENT_WINDOW_IDS_IN_SESSION", "3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = StateConfig::from_lookup(&parameters).unwrap();
        let scope = ScopeConfig::from_lookup(&parameters).unwrap();
        assert_eq!(config.state_saving_method, StateSavingMethod::Client);
        assert_eq!(scope.number_of_client_window_ids_in_session, 3);

        let time = Arc::new(ManualTimeSource::new(0));
        let service = StateCacheService::new(config, None, time.clone()).unwrap();
        assert!(service.is_client_side());
        let session = Session::new_shared();
        let token = service
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap();

        time.advance(MINUTE + 1);
        assert!(service
            .restore_serialized_view(&mut request(&session, "/a.xhtml"), "/a.xhtml", &token)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_fixed_field_mode_without_iv_fails_on_use() {
        let parameters: HashMap<String, String> = [
            (codec_params::ALGORITHM_PARAMETERS, "GCM/FixedField"),
            (params::STATE_SAVING_METHOD, "client"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = StateConfig::from_lookup(&parameters).unwrap();
        let service =
            StateCacheService::new(config, None, Arc::new(ManualTimeSource::new(0))).unwrap();
        let session = Session::new_shared();

        let err = service
            .save_serialized_view(&mut request(&session, "/a.xhtml"), page("/a.xhtml"))
            .unwrap_err();

        assert!(matches!(err, StateCacheError::Codec(CodecError::Configuration(_))));
        assert!(err.to_string().contains(codec_params::ALGORITHM_IV));
    }
}
