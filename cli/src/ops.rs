//! Encrypt/decrypt command bodies.
//!
//! The engine itself performs no I/O; everything file-shaped happens
//! here. Encryption seals the payload under a fresh random key, splits
//! the key and writes one encoded fragment per line to the keys file.
//! Decryption reads back whatever subset of fragments was gathered,
//! combines them and unseals the payload.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use keyshard_sharing::{
    ChaChaPayloadCipher, PayloadCipher, Scheme, Secret, ThresholdScheme, decode_fragments,
    encode_fragments,
};

/// Settings for the `encrypt` command
#[derive(Debug)]
pub struct EncryptConfig {
    pub scheme: Scheme,
    pub infile: PathBuf,
    pub outfile: PathBuf,
    pub keysfile: PathBuf,
    pub n: usize,
    pub k: usize,
}

/// Settings for the `decrypt` command
pub struct DecryptConfig {
    pub scheme: Scheme,
    pub infile: PathBuf,
    pub outfile: PathBuf,
    pub keysfile: PathBuf,
}

/// Seal `infile` into `outfile` and split the key into `keysfile`
pub fn encrypt(config: &EncryptConfig) -> anyhow::Result<()> {
    let plaintext = fs::read(&config.infile)
        .with_context(|| format!("reading {}", config.infile.display()))?;

    let mut rng = rand::thread_rng();
    let key = Secret::random(&mut rng);

    let cipher = ChaChaPayloadCipher;
    let ciphertext = cipher.encrypt(key.as_bytes(), &plaintext)?;
    fs::write(&config.outfile, &ciphertext)
        .with_context(|| format!("writing {}", config.outfile.display()))?;

    log::debug!(
        "splitting key with {} scheme, k={}, n={}",
        config.scheme.name(),
        config.k,
        config.n
    );
    let fragments = config.scheme.split(&key, config.k, config.n, &mut rng)?;
    fs::write(&config.keysfile, encode_fragments(&fragments))
        .with_context(|| format!("writing {}", config.keysfile.display()))?;

    println!(
        "🔐 Sealed {} -> {} and wrote {} fragments to {} (any {} recover the key)",
        config.infile.display(),
        config.outfile.display(),
        config.n,
        config.keysfile.display(),
        config.k,
    );
    Ok(())
}

/// Combine the fragments in `keysfile` and unseal `infile` into `outfile`
pub fn decrypt(config: &DecryptConfig) -> anyhow::Result<()> {
    let ciphertext = fs::read(&config.infile)
        .with_context(|| format!("reading {}", config.infile.display()))?;
    let text = fs::read_to_string(&config.keysfile)
        .with_context(|| format!("reading {}", config.keysfile.display()))?;

    let fragments = decode_fragments(&text)?;
    log::debug!("combining {} fragments", fragments.len());
    let key = config.scheme.combine(&fragments)?;

    let cipher = ChaChaPayloadCipher;
    let plaintext = cipher.decrypt(key.as_bytes(), &ciphertext)?;
    fs::write(&config.outfile, &plaintext)
        .with_context(|| format!("writing {}", config.outfile.display()))?;

    println!(
        "✅ Recovered key from {} fragments and wrote plaintext to {}",
        fragments.len(),
        config.outfile.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("keyshard-{tag}-{}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn path(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn roundtrip(dir: &TempDir, scheme: &str, plaintext: &[u8]) {
        let infile = dir.path("plain.bin");
        fs::write(&infile, plaintext).unwrap();

        encrypt(&EncryptConfig {
            scheme: scheme.parse().unwrap(),
            infile: infile.clone(),
            outfile: dir.path("cipher.bin"),
            keysfile: dir.path("keys.txt"),
            n: 3,
            k: 2,
        })
        .unwrap();

        // ciphertext differs from the plaintext
        assert_ne!(fs::read(dir.path("cipher.bin")).unwrap(), plaintext);

        decrypt(&DecryptConfig {
            scheme: scheme.parse().unwrap(),
            infile: dir.path("cipher.bin"),
            outfile: dir.path("restored.bin"),
            keysfile: dir.path("keys.txt"),
        })
        .unwrap();

        assert_eq!(fs::read(dir.path("restored.bin")).unwrap(), plaintext);
    }

    #[test]
    fn test_file_roundtrip_every_scheme() {
        for scheme in ["geometric", "polynomial", "congruence"] {
            let dir = TempDir::new(&format!("roundtrip-{scheme}"));
            roundtrip(&dir, scheme, b"some payload worth protecting");
        }
    }

    #[test]
    fn test_subset_of_fragments_suffices() {
        let dir = TempDir::new("subset");
        let infile = dir.path("plain.bin");
        fs::write(&infile, b"payload").unwrap();

        encrypt(&EncryptConfig {
            scheme: "polynomial".parse().unwrap(),
            infile,
            outfile: dir.path("cipher.bin"),
            keysfile: dir.path("keys.txt"),
            n: 3,
            k: 2,
        })
        .unwrap();

        // keep only the last two of the three fragment lines
        keep_lines(&dir.path("keys.txt"), 1..3);

        decrypt(&DecryptConfig {
            scheme: "polynomial".parse().unwrap(),
            infile: dir.path("cipher.bin"),
            outfile: dir.path("restored.bin"),
            keysfile: dir.path("keys.txt"),
        })
        .unwrap();

        assert_eq!(fs::read(dir.path("restored.bin")).unwrap(), b"payload");
    }

    #[test]
    fn test_too_few_fragments_fail() {
        let dir = TempDir::new("toofew");
        let infile = dir.path("plain.bin");
        fs::write(&infile, b"payload").unwrap();

        encrypt(&EncryptConfig {
            scheme: "polynomial".parse().unwrap(),
            infile,
            outfile: dir.path("cipher.bin"),
            keysfile: dir.path("keys.txt"),
            n: 3,
            k: 2,
        })
        .unwrap();

        keep_lines(&dir.path("keys.txt"), 0..1);

        let result = decrypt(&DecryptConfig {
            scheme: "polynomial".parse().unwrap(),
            infile: dir.path("cipher.bin"),
            outfile: dir.path("restored.bin"),
            keysfile: dir.path("keys.txt"),
        });
        assert!(result.is_err());
        assert!(!dir.path("restored.bin").exists());
    }

    fn keep_lines(path: &Path, range: std::ops::Range<usize>) {
        let text = fs::read_to_string(path).unwrap();
        let kept: Vec<&str> = text.lines().collect::<Vec<_>>()[range].to_vec();
        fs::write(path, format!("{}\n", kept.join("\n"))).unwrap();
    }
}
