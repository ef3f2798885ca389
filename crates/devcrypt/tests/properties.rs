//! Property tests for the facade over an in-memory store.

use std::path::{Path, PathBuf};

use devcrypt::envelope::ContainerFile;
use devcrypt::{Access, Devcrypt, DevcryptConfig, MemoryStore, PublicKey, Store};
use devcrypt_testkit::generators::{boundary_len, filename, private_keys};
use devcrypt_testkit::{key_paths, plaintext};
use proptest::prelude::*;

fn devcrypt() -> Devcrypt<MemoryStore> {
    let dc = Devcrypt::new(
        MemoryStore::new(),
        DevcryptConfig::new(key_paths(Path::new("/config"))),
    );
    dc.keygen("owner", false).unwrap();
    dc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn sizes_at_chunk_boundaries(name in filename(), len in boundary_len()) {
        let dc = devcrypt();
        let input = PathBuf::from("/work").join(&name);
        let content = plaintext(len);
        dc.store().persist(&input, &content, Access::Private).unwrap();

        let report = dc.encrypt(&input, None).unwrap();
        let info = dc.info(&report.output).unwrap();
        prop_assert_eq!(info.filename, name);
        prop_assert_eq!(info.plaintext_size, Some(len));

        let out = dc.decrypt(&report.output, Some(Path::new("/work/out"))).unwrap();
        prop_assert_eq!(dc.store().read(&out).unwrap(), content);
    }

    #[test]
    fn added_recipients_read_and_removed_ones_do_not(members in private_keys(2, 4)) {
        let dc = devcrypt();
        let input = Path::new("/work/team.env");
        dc.store().persist(input, b"SHARED=1", Access::Private).unwrap();
        let encrypted = dc.encrypt(input, None).unwrap().output;

        let public_keys: Vec<PublicKey> = members.iter().map(|key| key.public_key()).collect();
        dc.add(&encrypted, &public_keys).unwrap();

        let removed = &public_keys[0];
        dc.remove(&encrypted, &[removed.key_base64()]).unwrap();

        let container = ContainerFile::from_bytes(&dc.store().read(&encrypted).unwrap()).unwrap();
        prop_assert_eq!(container.public_keys().len(), members.len());
        prop_assert!(container.unseal(&members[0]).is_err());
        for member in &members[1..] {
            let opened = container.unseal(member).unwrap();
            prop_assert_eq!(opened.decrypt_content().unwrap(), b"SHARED=1".to_vec());
        }
    }
}
