//! Builders for the standard account contracts and their parameters.
//!
//! Single signature:  code = `<pubkey> CHECKSIG`, parameter = `<sig>`
//! Multi signature:   code = `<m> <pubkey_1> … <pubkey_n> <n> CHECKMULTISIG`,
//!                    parameter = `<sig_1> … <sig_m>` in key order

use thiserror::Error;

use crate::opcode::{CHECKMULTISIG, CHECKSIG, PUSH0, PUSH1, PUSHDATA1, PUSHDATA2, PUSHBYTES75};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("item of {len} bytes cannot be pushed (limit {})", u16::MAX)]
    ItemTooLarge { len: usize },

    #[error("threshold {m} of {n} keys is not satisfiable")]
    InvalidThreshold { m: usize, n: usize },
}

/// Append a push of `data` using the shortest encoding.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) -> Result<(), ContractError> {
    let len = data.len();
    if len <= PUSHBYTES75 as usize {
        // PUSHBYTES0 is PUSH0, so an empty item needs no special case.
        script.push(len as u8);
    } else if len <= u8::MAX as usize {
        script.push(PUSHDATA1);
        script.push(len as u8);
    } else if len <= u16::MAX as usize {
        script.push(PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        return Err(ContractError::ItemTooLarge { len });
    }
    script.extend_from_slice(data);
    Ok(())
}

/// Append a push of a non-negative number.
pub fn push_number(script: &mut Vec<u8>, n: usize) {
    match n {
        0 => script.push(PUSH0),
        1..=16 => script.push(PUSH1 + (n as u8 - 1)),
        _ => {
            let mut bytes = n.to_le_bytes().to_vec();
            while bytes.last() == Some(&0) {
                bytes.pop();
            }
            // Keep the top bit clear so the number stays positive.
            if bytes.last().is_some_and(|b| b & 0x80 != 0) {
                bytes.push(0);
            }
            // At most 9 bytes, well under PUSHBYTES75.
            script.push(bytes.len() as u8);
            script.extend_from_slice(&bytes);
        }
    }
}

/// `<pubkey> CHECKSIG`
pub fn single_sig_contract(pubkey: &[u8]) -> Result<Vec<u8>, ContractError> {
    let mut script = Vec::with_capacity(pubkey.len() + 2);
    push_data(&mut script, pubkey)?;
    script.push(CHECKSIG);
    Ok(script)
}

/// `<m> <pubkeys…> <n> CHECKMULTISIG`, requiring `1 <= m <= n`.
pub fn multi_sig_contract<K: AsRef<[u8]>>(m: usize, pubkeys: &[K]) -> Result<Vec<u8>, ContractError> {
    let n = pubkeys.len();
    if m == 0 || m > n {
        return Err(ContractError::InvalidThreshold { m, n });
    }

    let mut script = Vec::new();
    push_number(&mut script, m);
    for key in pubkeys {
        push_data(&mut script, key.as_ref())?;
    }
    push_number(&mut script, n);
    script.push(CHECKMULTISIG);
    Ok(script)
}

/// A push-only parameter segment pushing each signature in order.
pub fn signature_parameter<S: AsRef<[u8]>>(signatures: &[S]) -> Result<Vec<u8>, ContractError> {
    let mut script = Vec::new();
    for sig in signatures {
        push_data(&mut script, sig.as_ref())?;
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{PUSH16, PUSHBYTES1};

    #[test]
    fn single_sig_layout() {
        let key = [0x02; 33];
        let script = single_sig_contract(&key).unwrap();
        assert_eq!(script.len(), 35);
        assert_eq!(script[0], 33);
        assert_eq!(&script[1..34], &key);
        assert_eq!(script[34], CHECKSIG);
    }

    #[test]
    fn multi_sig_layout() {
        let keys = [[0x02; 33], [0x03; 33]];
        let script = multi_sig_contract(2, &keys).unwrap();
        assert_eq!(script[0], PUSH1 + 1);
        assert_eq!(script[script.len() - 2], PUSH1 + 1);
        assert_eq!(*script.last().unwrap(), CHECKMULTISIG);
    }

    #[test]
    fn multi_sig_threshold_bounds() {
        let keys = [[0x02; 33]];
        assert_eq!(
            multi_sig_contract(0, &keys),
            Err(ContractError::InvalidThreshold { m: 0, n: 1 })
        );
        assert_eq!(
            multi_sig_contract(2, &keys),
            Err(ContractError::InvalidThreshold { m: 2, n: 1 })
        );
    }

    #[test]
    fn push_data_picks_shortest_encoding() {
        let mut s = Vec::new();
        push_data(&mut s, &[0xaa]).unwrap();
        assert_eq!(s, vec![PUSHBYTES1, 0xaa]);

        let mut s = Vec::new();
        push_data(&mut s, &[0u8; 76]).unwrap();
        assert_eq!(&s[..2], &[PUSHDATA1, 76]);

        let mut s = Vec::new();
        push_data(&mut s, &[0u8; 256]).unwrap();
        assert_eq!(&s[..3], &[PUSHDATA2, 0x00, 0x01]);

        let mut s = Vec::new();
        assert_eq!(
            push_data(&mut s, &vec![0u8; 70_000]),
            Err(ContractError::ItemTooLarge { len: 70_000 })
        );
    }

    #[test]
    fn push_number_encodings() {
        let mut s = Vec::new();
        push_number(&mut s, 16);
        assert_eq!(s, vec![PUSH16]);

        let mut s = Vec::new();
        push_number(&mut s, 17);
        assert_eq!(s, vec![1, 17]);

        // 0x80 would read back as negative, so a zero byte is appended.
        let mut s = Vec::new();
        push_number(&mut s, 128);
        assert_eq!(s, vec![2, 0x80, 0x00]);
    }
}
