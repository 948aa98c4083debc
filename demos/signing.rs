use sha2::{Digest, Sha256};
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use blind_ecdsa::{
    BlindSignature, BlindSignatureClient, BlindSignatureCustodian, BlindedHash,
    ExtendedPrivateKey, ExtendedPublicKey, Signature,
};

const MESSAGE: &[u8] = b"Message To Be signed";
const INDEX: u32 = 0;

fn launch_client(
    sender: mpsc::Sender<Vec<u8>>,
    receiver: mpsc::Receiver<Vec<u8>>,
) -> Result<Signature, &'static str> {
    // Generate the client's extended key, keep the seed to restore it later.
    let (client_key, _seed) = ExtendedPrivateKey::generate();

    // Receive the custodian's xpub.
    let xpub = String::from_utf8(receiver.recv().unwrap())
        .map_err(|_| "An xpub is a base58 string")?;
    let custodian_key = ExtendedPublicKey::from_base58(&xpub)
        .map_err(|_| "Received an invalid extended public key")?;
    let client = BlindSignatureClient::new(client_key, custodian_key);

    // The public key for this index, this is what funds get locked to.
    let commitment = client
        .commitment_at_index(INDEX)
        .map_err(|_| "Index can't be used, move on to the next one")?;

    // Blind the hash and send it to the custodian.
    let hash: [u8; 32] = Sha256::digest(MESSAGE).into();
    let request = client
        .blinded_hash_for_hash(&hash, INDEX)
        .map_err(|_| "Failed blinding the hash")?;
    sender.send(request.serialize().to_vec()).unwrap();

    // Receive the blind signature.
    let blind_signature = BlindSignature::deserialize(
        receiver
            .recv_array()
            .map_err(|_| "Blind signatures are 32 bytes")?,
    )
    .map_err(|_| "Received an invalid blind signature")?;

    // Unblind it
    let sig = client
        .signature_for_blind_signature(&blind_signature, INDEX)
        .map_err(|_| "Failed unblinding the signature")?;

    // Make sure the signature verifies against the blinded public key
    if sig.verify(&hash, commitment.T()).is_err() {
        return Err("Resulted in a bad signature");
    }
    Ok(sig)
}

fn launch_custodian(
    sender: mpsc::Sender<Vec<u8>>,
    receiver: mpsc::Receiver<Vec<u8>>,
) -> Result<(), &'static str> {
    let (custodian_key, _seed) = ExtendedPrivateKey::generate();
    let custodian = BlindSignatureCustodian::new(custodian_key);

    // Hand out the extended public key as an xpub.
    sender
        .send(custodian.extended_public_key().to_base58().into_bytes())
        .unwrap();

    // Sign whatever the client asks for, it is blinded anyway.
    let request = BlindedHash::deserialize(
        receiver
            .recv_array()
            .map_err(|_| "Blinded hashes are 36 bytes")?,
    )
    .map_err(|_| "Received an invalid blinded hash")?;
    let blind_signature = custodian
        .sign_request(&request)
        .map_err(|_| "Failed signing the blinded hash")?;
    sender.send(blind_signature.serialize().to_vec()).unwrap();
    Ok(())
}

fn main() {
    let (client_sender, custodian_receiver) = mpsc::channel();
    let (custodian_sender, client_receiver) = mpsc::channel();
    let client = std::thread::spawn(move || launch_client(client_sender, client_receiver));
    let custodian =
        std::thread::spawn(move || launch_custodian(custodian_sender, custodian_receiver));
    custodian.join().unwrap().unwrap();
    println!("custodian finished without an error!");
    let sig = client.join().unwrap().unwrap();
    println!(
        "client finished without an error! signature: {:?}",
        sig.to_der().unwrap()
    );
}

trait ReceiveArray {
    fn recv_array<const N: usize>(&self) -> Result<[u8; N], Vec<u8>>;
}
impl ReceiveArray for Receiver<Vec<u8>> {
    fn recv_array<const N: usize>(&self) -> Result<[u8; N], Vec<u8>> {
        self.recv().unwrap().try_into()
    }
}

#[test]
fn test_main() {
    main()
}
