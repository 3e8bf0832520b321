//! Stateless checks on decoded or freshly signed transactions
use crate::error::StacksError;
use crate::transaction::types::{HashMode, StacksTransaction};

impl StacksTransaction {
    /// Validates just the origin signature: the key recovered from the
    /// presign sighash must hash to the signer field.
    pub fn validate_signature(&self) -> Result<(), StacksError> {
        if !self.is_signed() {
            return Err(StacksError::InvalidTransaction(
                "Transaction not signed".to_string(),
            ));
        }

        if self.auth.hash_mode != HashMode::P2PKH {
            return Err(StacksError::InvalidTransaction(format!(
                "Signature checks are only supported for P2PKH, got {:?}",
                self.auth.hash_mode
            )));
        }

        let sighash = self.presign_sighash();
        let public_key = self
            .auth
            .signature
            .recover(&sighash, self.auth.key_encoding.is_compressed())?;

        if public_key.hash160() != self.auth.signer {
            return Err(StacksError::InvalidTransaction(format!(
                "Signature was made by {}, not signer {}",
                hex::encode(public_key.hash160()),
                hex::encode(self.auth.signer)
            )));
        }

        Ok(())
    }

    /// Performs the full stateless validation of a signed transfer.
    pub fn validate(&self) -> Result<(), StacksError> {
        if self.chain_id != self.network().chain_id() {
            return Err(StacksError::InvalidTransaction(format!(
                "Chain id 0x{:08x} does not match {} transaction version",
                self.chain_id,
                self.network()
            )));
        }

        let recipient_network = self.payload.recipient.address().network();
        if recipient_network.is_some_and(|network| network != self.network()) {
            return Err(StacksError::InvalidTransaction(format!(
                "Recipient {} is not a {} address",
                self.payload.recipient,
                self.network()
            )));
        }

        self.validate_signature()
    }
}
