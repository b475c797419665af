//! Pairing Integration Tests
//!
//! Drives the full handshake against a fake TV that checks every client
//! message and answers with the next step.

mod common;

use androidtv_protocol::certificate::rsa_modulus;
use androidtv_protocol::messages::pairing_message::Payload;
use androidtv_protocol::messages::{
    PairingConfigurationAck, PairingEncoding, PairingOption, PairingRequestAck,
    PairingSecretAck, PairingStatus, RoleType,
};
use androidtv_protocol::pairing::compute_secret;
use androidtv_protocol::{
    CallbackDelegate, PairingMessage, PairingSession, PairingState, ProtocolError,
    PROTOCOL_VERSION,
};
use common::FakeTv;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PIN: &str = "4D2F1A";

fn tv_reply(payload: Payload) -> PairingMessage {
    PairingMessage::ok(payload)
}

fn tv_error(payload: Payload, status: PairingStatus) -> PairingMessage {
    let mut message = PairingMessage::ok(payload);
    message.status = status as i32;
    message
}

#[tokio::test]
async fn test_full_handshake() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);
    let certificate = common::client_certificate();

    let completed = Arc::new(AtomicUsize::new(0));
    let delegate = CallbackDelegate::new(|| Ok(PIN.to_string())).on_complete({
        let completed = completed.clone();
        move || {
            completed.fetch_add(1, Ordering::SeqCst);
        }
    });

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(&config, certificate.clone(), delegate),
        tv.accept()
    );
    let pairing = pairing.unwrap();
    assert_eq!(pairing.state(), PairingState::Init);

    pairing.request().await.unwrap();
    assert_eq!(pairing.state(), PairingState::Requested);

    let request: PairingMessage = connection.recv().await;
    assert_eq!(request.protocol_version, PROTOCOL_VERSION);
    assert_eq!(request.status(), PairingStatus::Ok);
    match request.payload {
        Some(Payload::Request(request)) => {
            assert_eq!(request.service_name, config.pairing.service_name);
            assert_eq!(request.client_name, config.pairing.client_name);
        }
        other => panic!("expected a pairing request, got {:?}", other),
    }

    connection
        .send(&tv_reply(Payload::RequestAck(PairingRequestAck {
            server_name: "Living Room".to_string(),
        })))
        .await;

    let option: PairingMessage = connection.recv().await;
    let offered = match option.payload {
        Some(Payload::Option(option)) => option,
        other => panic!("expected a pairing option, got {:?}", other),
    };
    assert_eq!(offered.preferred_role(), RoleType::Input);
    assert_eq!(offered.input_encodings, vec![PairingEncoding::hexadecimal()]);
    assert!(offered.output_encodings.is_empty());

    connection
        .send(&tv_reply(Payload::Option(PairingOption {
            input_encodings: vec![PairingEncoding::hexadecimal()],
            output_encodings: Vec::new(),
            preferred_role: RoleType::Input as i32,
        })))
        .await;

    let configuration: PairingMessage = connection.recv().await;
    match configuration.payload {
        Some(Payload::Configuration(configuration)) => {
            assert_eq!(configuration.client_role(), RoleType::Input);
            assert_eq!(configuration.encoding, Some(PairingEncoding::hexadecimal()));
        }
        other => panic!("expected a pairing configuration, got {:?}", other),
    }

    connection
        .send(&tv_reply(Payload::ConfigurationAck(PairingConfigurationAck {})))
        .await;

    let secret: PairingMessage = connection.recv().await;
    let secret = match secret.payload {
        Some(Payload::Secret(secret)) => secret.secret,
        other => panic!("expected a pairing secret, got {:?}", other),
    };

    // Recompute from what the TV observed on the wire
    let client = connection.client_certificate().unwrap();
    let expected = compute_secret(
        &rsa_modulus(&client).unwrap(),
        &tv.certificate.public_modulus().unwrap(),
        PIN,
    )
    .unwrap();
    assert_eq!(secret, expected.to_vec());

    connection
        .send(&tv_reply(Payload::SecretAck(PairingSecretAck { secret })))
        .await;

    pairing.listen().await.unwrap();
    assert_eq!(pairing.state(), PairingState::Paired);
    assert_eq!(completed.load(Ordering::SeqCst), 1);

    assert!(matches!(
        pairing.listen().await,
        Err(ProtocolError::ListenerConsumed)
    ));
}

#[tokio::test]
async fn test_rejected_request_stops_handshake() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(
            &config,
            common::client_certificate(),
            CallbackDelegate::new(|| Ok(PIN.to_string())),
        ),
        tv.accept()
    );
    let pairing = pairing.unwrap();

    pairing.request().await.unwrap();
    let _request: PairingMessage = connection.recv().await;

    connection
        .send(&tv_error(
            Payload::RequestAck(PairingRequestAck::default()),
            PairingStatus::Error,
        ))
        .await;

    let err = pairing.listen().await.unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::PairingFailed {
            step: "request",
            status: PairingStatus::Error
        }
    ));
    assert_eq!(pairing.state(), PairingState::Failed);

    // No option follows a rejected request
    assert!(connection.try_recv::<PairingMessage>().await.is_none());
}

#[tokio::test]
async fn test_late_request_keeps_failed_state() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(
            &config,
            common::client_certificate(),
            CallbackDelegate::new(|| Ok(PIN.to_string())),
        ),
        tv.accept()
    );
    let pairing = pairing.unwrap();

    // The TV answers before the request went out
    connection
        .send(&tv_error(
            Payload::RequestAck(PairingRequestAck::default()),
            PairingStatus::Error,
        ))
        .await;
    assert!(pairing.listen().await.is_err());
    assert_eq!(pairing.state(), PairingState::Failed);

    pairing.request().await.unwrap();
    assert_eq!(pairing.state(), PairingState::Failed);
    let _request: PairingMessage = connection.recv().await;
}

#[tokio::test]
async fn test_bad_secret_fails() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);

    let completed = Arc::new(AtomicUsize::new(0));
    let delegate = CallbackDelegate::new(|| Ok(PIN.to_string())).on_complete({
        let completed = completed.clone();
        move || {
            completed.fetch_add(1, Ordering::SeqCst);
        }
    });

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(&config, common::client_certificate(), delegate),
        tv.accept()
    );
    let pairing = pairing.unwrap();

    // The TV may skip ahead; the client answers each message on its own
    connection
        .send(&tv_reply(Payload::ConfigurationAck(PairingConfigurationAck {})))
        .await;
    let _secret: PairingMessage = connection.recv().await;

    connection
        .send(&tv_error(
            Payload::SecretAck(PairingSecretAck::default()),
            PairingStatus::BadSecret,
        ))
        .await;

    let err = pairing.listen().await.unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::PairingFailed {
            step: "secret",
            status: PairingStatus::BadSecret
        }
    ));
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_pin_aborts() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(
            &config,
            common::client_certificate(),
            CallbackDelegate::new(|| Ok("12ZZ".to_string())),
        ),
        tv.accept()
    );
    let pairing = pairing.unwrap();

    connection
        .send(&tv_reply(Payload::ConfigurationAck(PairingConfigurationAck {})))
        .await;

    let err = pairing.listen().await.unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidSecret(_)));
    assert_eq!(pairing.state(), PairingState::Failed);
    assert!(connection.try_recv::<PairingMessage>().await.is_none());
}

#[tokio::test]
async fn test_unexpected_error_status_fails() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(
            &config,
            common::client_certificate(),
            CallbackDelegate::new(|| Ok(PIN.to_string())),
        ),
        tv.accept()
    );
    let pairing = pairing.unwrap();

    let message = PairingMessage {
        protocol_version: PROTOCOL_VERSION,
        status: PairingStatus::BadConfiguration as i32,
        ..Default::default()
    };
    connection.send(&message).await;

    let err = pairing.listen().await.unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::PairingFailed {
            status: PairingStatus::BadConfiguration,
            ..
        }
    ));
}

#[tokio::test]
async fn test_close_ends_listen() {
    let tv = FakeTv::bind().await;
    let config = common::config_for(&tv);

    let (pairing, mut connection) = tokio::join!(
        PairingSession::connect(
            &config,
            common::client_certificate(),
            CallbackDelegate::new(|| Ok(PIN.to_string())),
        ),
        tv.accept()
    );
    let pairing = pairing.unwrap();

    pairing.close().await.unwrap();
    pairing.listen().await.unwrap();
    assert!(connection.at_eof().await);
    assert!(matches!(
        pairing.request().await,
        Err(ProtocolError::ConnectionClosed)
    ));
}
