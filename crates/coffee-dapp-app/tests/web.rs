//! Browser tests for the wasm glue. Run with `wasm-pack test --headless --firefox`.

use coffee::DappError;
use coffee_app::wallet::provider_error_from_js;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_error(code: f64, message: &str) -> JsValue {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"code".into(), &code.into()).unwrap();
    js_sys::Reflect::set(&obj, &"message".into(), &message.into()).unwrap();
    obj.into()
}

#[wasm_bindgen_test]
fn rejection_code_maps_to_user_rejected() {
    let err = provider_error_from_js(&js_error(4001.0, "User rejected the request."));
    assert_eq!(err.code, Some(4001));
    assert!(matches!(
        DappError::from(err),
        DappError::UserRejected(msg) if msg == "User rejected the request."
    ));
}

#[wasm_bindgen_test]
fn other_codes_keep_the_message() {
    let err = provider_error_from_js(&js_error(-32603.0, "Internal JSON-RPC error."));
    match DappError::from(err) {
        DappError::CallFailed(msg) => assert_eq!(msg, "Internal JSON-RPC error."),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[wasm_bindgen_test]
fn plain_string_rejection() {
    let err = provider_error_from_js(&JsValue::from_str("boom"));
    assert_eq!(err.code, None);
    assert_eq!(err.message, "boom");
}

#[wasm_bindgen_test]
fn config_defaults_to_sepolia() {
    let config = coffee_app::app_config();
    assert_eq!(config.chain.chain_id, coffee::SEPOLIA_CHAIN_ID);
    assert!(config.contract().is_ok());
}
