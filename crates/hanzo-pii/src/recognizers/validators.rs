//! Checksum algorithms used to confirm pattern matches

use sha2::{Digest, Sha256};

/// Decimal digits of `value`, ignoring separators
pub fn digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Weighted sum of `digits` against `weights`
fn weighted_sum(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights).map(|(d, w)| d * w).sum()
}

/// Whether every digit is the same (000000000, 111111111, ...)
pub fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Luhn algorithm for card numbers
pub fn luhn(number: &str) -> bool {
    let digits = digits(number);
    if digits.len() < 13 {
        return false;
    }

    let mut sum = 0;
    let mut double = false;

    for &digit in digits.iter().rev() {
        let mut d = digit;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }

    sum % 10 == 0
}

/// ISO 13616 mod-97 check for IBANs
pub fn iban(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !(15..=34).contains(&compact.len()) || !compact.is_ascii() {
        return false;
    }

    let (head, tail) = compact.split_at(4);
    let mut remainder: u64 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = match c.to_digit(36) {
            Some(v) => v as u64,
            None => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder == 1
}

const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Verhoeff check (Aadhaar)
pub fn verhoeff(value: &str) -> bool {
    let mut c = 0usize;
    for (i, d) in digits(value).iter().rev().enumerate() {
        c = VERHOEFF_D[c][VERHOEFF_P[i % 8][*d as usize] as usize] as usize;
    }
    c == 0
}

/// Australian Business Number
pub fn au_abn(value: &str) -> bool {
    let mut d = digits(value);
    if d.len() != 11 || d[0] == 0 {
        return false;
    }
    d[0] -= 1;
    weighted_sum(&d, &[10, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19]) % 89 == 0
}

/// Australian Company Number
pub fn au_acn(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 9 {
        return false;
    }
    let remainder = weighted_sum(&d[..8], &[8, 7, 6, 5, 4, 3, 2, 1]) % 10;
    (10 - remainder) % 10 == d[8]
}

/// Australian Tax File Number
pub fn au_tfn(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 9 {
        return false;
    }
    weighted_sum(&d, &[1, 4, 3, 7, 5, 8, 6, 9, 10]) % 11 == 0
}

/// Australian Medicare card number
pub fn au_medicare(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 10 {
        return false;
    }
    weighted_sum(&d[..8], &[1, 3, 7, 9, 1, 3, 7, 9]) % 10 == d[8]
}

/// UK NHS number (mod 11)
pub fn uk_nhs(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 10 || all_same(&d) {
        return false;
    }
    weighted_sum(&d, &[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]) % 11 == 0
}

/// Polish PESEL
pub fn pl_pesel(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 11 {
        return false;
    }
    let sum = weighted_sum(&d[..10], &[1, 3, 7, 9, 1, 3, 7, 9, 1, 3]);
    (10 - sum % 10) % 10 == d[10]
}

const ES_LETTERS: &[u8] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Spanish DNI/NIF control letter
pub fn es_nif(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| *c != '-').collect();
    let Some(letter) = compact.chars().last() else {
        return false;
    };
    let number: String = compact.chars().filter(char::is_ascii_digit).collect();
    match number.parse::<usize>() {
        Ok(n) if !number.is_empty() => ES_LETTERS[n % 23] as char == letter.to_ascii_uppercase(),
        _ => false,
    }
}

/// Spanish NIE: X/Y/Z prefix maps to 0/1/2, then the NIF rule
pub fn es_nie(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| *c != '-').collect();
    let prefix = match compact.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('X') => '0',
        Some('Y') => '1',
        Some('Z') => '2',
        _ => return false,
    };
    es_nif(&format!("{}{}", prefix, &compact[1..]))
}

const FI_CHECK: &[u8] = b"0123456789ABCDEFHJKLMNPRSTUVWXY";

/// Finnish personal identity code (henkilötunnus)
pub fn fi_personal_identity_code(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() != 11 {
        return false;
    }
    let number: String = chars[..6].iter().chain(chars[7..10].iter()).collect();
    match number.parse::<usize>() {
        Ok(n) => FI_CHECK[n % 31] as char == chars[10].to_ascii_uppercase(),
        Err(_) => false,
    }
}

/// Korean resident registration number
pub fn kr_rrn(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 13 {
        return false;
    }
    let sum = weighted_sum(&d[..12], &[2, 3, 4, 5, 6, 7, 8, 9, 2, 3, 4, 5]);
    (11 - sum % 11) % 10 == d[12]
}

/// Singapore NRIC/FIN check letter (S, T, F and G series)
pub fn sg_nric(value: &str) -> Option<bool> {
    let chars: Vec<char> = value.chars().map(|c| c.to_ascii_uppercase()).collect();
    if chars.len() != 9 {
        return Some(false);
    }
    let d = digits(&chars[1..8].iter().collect::<String>());
    if d.len() != 7 {
        return Some(false);
    }
    let (offset, table): (u32, &[u8]) = match chars[0] {
        'S' => (0, b"JZIHGFEDCBA"),
        'T' => (4, b"JZIHGFEDCBA"),
        'F' => (0, b"XWUTRQPNMLK"),
        'G' => (4, b"XWUTRQPNMLK"),
        // M series uses a different scheme; keep the pattern score
        _ => return None,
    };
    let remainder = (weighted_sum(&d, &[2, 7, 6, 5, 4, 3, 2]) + offset) % 11;
    Some(table[remainder as usize] as char == chars[8])
}

/// US ABA routing number
pub fn aba_routing(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 9 || all_same(&d) {
        return false;
    }
    weighted_sum(&d, &[3, 7, 1, 3, 7, 1, 3, 7, 1]) % 10 == 0
}

/// US DEA registration number (medical license)
pub fn dea(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 7 {
        return false;
    }
    let sum = d[0] + d[2] + d[4] + 2 * (d[1] + d[3] + d[5]);
    sum % 10 == d[6]
}

const IT_ODD: [u32; 26] = [
    1, 0, 5, 7, 9, 13, 15, 17, 19, 21, 2, 4, 18, 20, 11, 3, 6, 8, 12, 14, 16, 10, 22, 25, 24, 23,
];

/// Italian fiscal code (codice fiscale) control character
pub fn it_fiscal_code(value: &str) -> bool {
    let chars: Vec<char> = value.chars().map(|c| c.to_ascii_uppercase()).collect();
    if chars.len() != 16 || !chars.iter().all(char::is_ascii_alphanumeric) {
        return false;
    }

    let mut sum = 0;
    for (i, c) in chars[..15].iter().enumerate() {
        let index = match c.to_digit(10) {
            Some(d) => d,
            None => *c as u32 - 'A' as u32,
        };
        // Positions are 1-based in the standard: even index is an odd position
        sum += if i % 2 == 0 {
            IT_ODD[index as usize]
        } else {
            index
        };
    }
    char::from(b'A' + (sum % 26) as u8) == chars[15]
}

/// Italian VAT code (partita IVA)
pub fn it_vat(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 11 || d.iter().all(|x| *x == 0) {
        return false;
    }
    let mut sum = 0;
    for (i, digit) in d[..10].iter().enumerate() {
        if i % 2 == 0 {
            sum += digit;
        } else {
            let doubled = digit * 2;
            sum += if doubled > 9 { doubled - 9 } else { doubled };
        }
    }
    (10 - sum % 10) % 10 == d[10]
}

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Decode base58 text into bytes
pub fn base58_decode(value: &str) -> Option<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    for c in value.bytes() {
        let mut carry = BASE58_ALPHABET.iter().position(|a| *a == c)? as u32;
        for byte in bytes.iter_mut().rev() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }
    let leading = value.bytes().take_while(|c| *c == b'1').count();
    let mut decoded = vec![0u8; leading];
    decoded.extend(bytes);
    Some(decoded)
}

/// Base58Check (legacy Bitcoin addresses)
pub fn base58check(value: &str) -> bool {
    let Some(decoded) = base58_decode(value) else {
        return false;
    };
    if decoded.len() != 25 {
        return false;
    }
    let (payload, checksum) = decoded.split_at(21);
    let hash = Sha256::digest(Sha256::digest(payload));
    hash[..4] == *checksum
}

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Shape check for bech32 segwit addresses
pub fn bech32_shape(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if lower != value && value.to_ascii_uppercase() != value {
        return false;
    }
    match lower.strip_prefix("bc1") {
        Some(data) => {
            matches!(lower.len(), 42 | 62) && data.chars().all(|c| BECH32_CHARSET.contains(c))
        }
        None => false,
    }
}
