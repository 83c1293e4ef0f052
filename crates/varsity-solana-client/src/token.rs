//! Token-2022 operator flows for the varsity token.
//!
//! Mint creation bundles the metadata-pointer and transfer-fee extensions
//! into one transaction. Instruction ordering is a hard constraint of the
//! token program: extensions initialize after the account exists and before
//! the mint itself; metadata is written only once the mint is live.

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_program::system_instruction;
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_token_2022::extension::transfer_fee::{TransferFeeAmount, TransferFeeConfig};
use spl_token_2022::extension::{
    metadata_pointer, transfer_fee, BaseStateWithExtensions, ExtensionType,
    StateWithExtensionsOwned,
};
use spl_token_2022::state::{Account as TokenAccount, Mint};
use spl_token_metadata_interface::state::TokenMetadata;

use crate::connection::ProgramConnection;
use crate::error::{VarsityError, VarsityResult};

/// Defaults matching the deployed varsity token.
pub const DEFAULT_TOKEN_NAME: &str = "Division 1";
pub const DEFAULT_TOKEN_SYMBOL: &str = "D1C";
pub const DEFAULT_TOKEN_URI: &str = "https://api.jsonbin.io/v3/qs/68641c458561e97a502fc72a";
pub const DEFAULT_TOKEN_DESCRIPTION: &str = "Division One Crypto Token";
pub const DEFAULT_DECIMALS: u8 = 9;
/// 3.5% transfer fee.
pub const DEFAULT_FEE_BASIS_POINTS: u16 = 350;
/// Fee cap: one billion whole tokens in base units.
pub const DEFAULT_MAXIMUM_FEE: u64 = 1_000_000_000_000_000_000;
/// Default supply grant: one billion whole tokens in base units.
pub const DEFAULT_SUPPLY: u64 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone)]
pub struct CreateTokenParams {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub additional_metadata: Vec<(String, String)>,
    pub decimals: u8,
    pub fee_basis_points: u16,
    pub maximum_fee: u64,
}

impl Default for CreateTokenParams {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            uri: DEFAULT_TOKEN_URI.to_string(),
            additional_metadata: vec![(
                "description".to_string(),
                DEFAULT_TOKEN_DESCRIPTION.to_string(),
            )],
            decimals: DEFAULT_DECIMALS,
            fee_basis_points: DEFAULT_FEE_BASIS_POINTS,
            maximum_fee: DEFAULT_MAXIMUM_FEE,
        }
    }
}

/// Everything needed to submit mint creation: the ordered instructions plus
/// the sizing numbers used to build them.
#[derive(Debug)]
pub struct CreateTokenPlan {
    pub instructions: Vec<Instruction>,
    /// Allocated account size: mint plus extension TLV entries.
    pub mint_space: usize,
    /// Metadata TLV bytes funded on top of `mint_space`. The token program
    /// appends these on metadata initialize, so they are covered by the
    /// rent deposit but not by the allocation.
    pub metadata_space: usize,
    pub rent_lamports: u64,
}

/// Build the five-instruction mint creation sequence. The payer acts as
/// mint, metadata and fee authority; the mint keypair must co-sign the
/// submitted transaction.
pub fn plan_create_token<C: ProgramConnection>(
    connection: &C,
    params: &CreateTokenParams,
    payer: &Pubkey,
    mint: &Pubkey,
) -> VarsityResult<CreateTokenPlan> {
    let token_program = spl_token_2022::id();

    let metadata = TokenMetadata {
        update_authority: Some(*payer).try_into()?,
        mint: *mint,
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        uri: params.uri.clone(),
        additional_metadata: params.additional_metadata.clone(),
    };
    // tlv_size_of already includes the 4-byte type/length header.
    let metadata_space = metadata.tlv_size_of()?;
    let mint_space = ExtensionType::try_calculate_account_len::<Mint>(&[
        ExtensionType::MetadataPointer,
        ExtensionType::TransferFeeConfig,
    ])?;
    let rent_lamports =
        connection.minimum_balance_for_rent_exemption(mint_space + metadata_space)?;

    let instructions = vec![
        system_instruction::create_account(
            payer,
            mint,
            rent_lamports,
            mint_space as u64,
            &token_program,
        ),
        metadata_pointer::instruction::initialize(
            &token_program,
            mint,
            Some(*payer),
            // The metadata lives on the mint account itself.
            Some(*mint),
        )?,
        transfer_fee::instruction::initialize_transfer_fee_config(
            &token_program,
            mint,
            Some(payer),
            Some(payer),
            params.fee_basis_points,
            params.maximum_fee,
        )?,
        spl_token_2022::instruction::initialize_mint(
            &token_program,
            mint,
            payer,
            None,
            params.decimals,
        )?,
        spl_token_metadata_interface::instruction::initialize(
            &token_program,
            mint,
            payer,
            mint,
            payer,
            params.name.clone(),
            params.symbol.clone(),
            params.uri.clone(),
        ),
    ];

    Ok(CreateTokenPlan {
        instructions,
        mint_space,
        metadata_space,
        rent_lamports,
    })
}

/// Associated token account for `owner` under Token-2022.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token_2022::id())
}

/// Instruction creating `owner`'s associated token account, funded by
/// `payer`.
pub fn create_associated_token_account_instruction(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account(
        payer,
        owner,
        mint,
        &spl_token_2022::id(),
    )
}

/// Mint `amount` base units to `destination`, signed by the mint authority.
pub fn mint_to_instruction(
    mint: &Pubkey,
    destination: &Pubkey,
    mint_authority: &Pubkey,
    amount: u64,
) -> VarsityResult<Instruction> {
    Ok(spl_token_2022::instruction::mint_to(
        &spl_token_2022::id(),
        mint,
        destination,
        mint_authority,
        &[],
        amount,
    )?)
}

/// Checked transfer of `amount` base units between token accounts.
pub fn transfer_checked_instruction(
    mint: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> VarsityResult<Instruction> {
    Ok(spl_token_2022::instruction::transfer_checked(
        &spl_token_2022::id(),
        source,
        mint,
        destination,
        owner,
        &[],
        amount,
        decimals,
    )?)
}

#[derive(Debug)]
pub struct MintSupplyPlan {
    pub instructions: Vec<Instruction>,
    pub associated_token_account: Pubkey,
    /// True when the plan includes creating the associated account.
    pub account_created: bool,
}

/// Instructions minting `amount` base units to `recipient`'s associated
/// account, creating that account first when it does not exist yet. One
/// fetch decides; the mint itself is a single submission either way.
pub fn plan_mint_supply<C: ProgramConnection>(
    connection: &C,
    mint: &Pubkey,
    recipient: &Pubkey,
    mint_authority: &Pubkey,
    payer: &Pubkey,
    amount: u64,
) -> VarsityResult<MintSupplyPlan> {
    let ata = associated_token_address(recipient, mint);
    let account_created = connection.get_account(&ata)?.is_none();
    let mut instructions = Vec::new();
    if account_created {
        instructions.push(create_associated_token_account_instruction(
            payer, recipient, mint,
        ));
    }
    instructions.push(mint_to_instruction(mint, &ata, mint_authority, amount)?);
    Ok(MintSupplyPlan {
        instructions,
        associated_token_account: ata,
        account_created,
    })
}

/// Transfer-fee configuration read back from a live mint.
#[derive(Debug, Clone)]
pub struct MintFeeConfig {
    pub decimals: u8,
    pub mint_authority: Option<Pubkey>,
    pub fee_basis_points: u16,
    pub maximum_fee: u64,
    pub withdraw_withheld_authority: Option<Pubkey>,
}

/// Read decimals and transfer-fee config from a deployed mint. Errors when
/// the mint is missing or carries no transfer-fee extension.
pub fn read_mint_fee_config<C: ProgramConnection>(
    connection: &C,
    mint: &Pubkey,
) -> VarsityResult<MintFeeConfig> {
    let account = connection
        .get_account(mint)?
        .ok_or(VarsityError::AccountNotFound(*mint))?;
    let state = StateWithExtensionsOwned::<Mint>::unpack(account.data).map_err(|e| {
        VarsityError::MalformedAccount {
            address: *mint,
            reason: e.to_string(),
        }
    })?;
    let config = state.get_extension::<TransferFeeConfig>().map_err(|_| {
        VarsityError::MalformedAccount {
            address: *mint,
            reason: "mint has no transfer-fee extension".to_string(),
        }
    })?;
    let fee = config.newer_transfer_fee;
    Ok(MintFeeConfig {
        decimals: state.base.decimals,
        mint_authority: Option::from(state.base.mint_authority),
        fee_basis_points: u16::from(fee.transfer_fee_basis_points),
        maximum_fee: u64::from(fee.maximum_fee),
        withdraw_withheld_authority: Option::from(config.withdraw_withheld_authority),
    })
}

/// Balance of a Token-2022 account; zero when the account does not exist.
pub fn token_balance<C: ProgramConnection>(
    connection: &C,
    address: &Pubkey,
) -> VarsityResult<u64> {
    match connection.get_account(address)? {
        None => Ok(0),
        Some(account) => {
            let state =
                StateWithExtensionsOwned::<TokenAccount>::unpack(account.data).map_err(|e| {
                    VarsityError::MalformedAccount {
                        address: *address,
                        reason: e.to_string(),
                    }
                })?;
            Ok(state.base.amount)
        }
    }
}

/// Withheld transfer fees accumulated on a token account; zero when the
/// account or the extension is absent.
pub fn withheld_amount<C: ProgramConnection>(
    connection: &C,
    address: &Pubkey,
) -> VarsityResult<u64> {
    match connection.get_account(address)? {
        None => Ok(0),
        Some(account) => {
            let state =
                StateWithExtensionsOwned::<TokenAccount>::unpack(account.data).map_err(|e| {
                    VarsityError::MalformedAccount {
                        address: *address,
                        reason: e.to_string(),
                    }
                })?;
            match state.get_extension::<TransferFeeAmount>() {
                Ok(ext) => Ok(u64::from(ext.withheld_amount)),
                Err(_) => Ok(0),
            }
        }
    }
}

/// Fee for `amount` under `fee_basis_points`, capped at `maximum_fee`.
/// Basis-point math rounds up, matching the token program.
pub fn expected_transfer_fee(amount: u64, fee_basis_points: u16, maximum_fee: u64) -> u64 {
    if fee_basis_points == 0 || amount == 0 {
        return 0;
    }
    let raw = (amount as u128 * fee_basis_points as u128).div_ceil(10_000);
    raw.min(maximum_fee as u128) as u64
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use solana_program::program_pack::Pack;
    use solana_program::system_program;
    use solana_sdk::account::Account;
    use solana_sdk::hash::Hash;
    use solana_sdk::signature::Signature;
    use solana_sdk::transaction::Transaction;

    use super::*;

    struct MapConnection {
        accounts: HashMap<Pubkey, Account>,
    }

    impl MapConnection {
        fn empty() -> Self {
            Self {
                accounts: HashMap::new(),
            }
        }
    }

    impl ProgramConnection for MapConnection {
        fn latest_blockhash(&self) -> VarsityResult<Hash> {
            Ok(Hash::default())
        }

        fn send_transaction(&self, _transaction: &Transaction) -> VarsityResult<Signature> {
            Ok(Signature::default())
        }

        fn get_account(&self, address: &Pubkey) -> VarsityResult<Option<Account>> {
            Ok(self.accounts.get(address).cloned())
        }

        fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VarsityResult<u64> {
            Ok(1_000 + data_len as u64 * 10)
        }
    }

    #[test]
    fn create_token_plan_orders_instructions() {
        let connection = MapConnection::empty();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let plan =
            plan_create_token(&connection, &CreateTokenParams::default(), &payer, &mint).unwrap();

        assert_eq!(plan.instructions.len(), 5);
        // System allocation first, sized at the mint space only.
        assert_eq!(plan.instructions[0].program_id, system_program::id());
        assert_eq!(plan.instructions[0].accounts[1].pubkey, mint);
        // Extension initializers run before InitializeMint.
        assert_eq!(plan.instructions[1].program_id, spl_token_2022::id());
        assert_eq!(plan.instructions[1].data[0], 39); // MetadataPointerExtension
        assert_eq!(plan.instructions[1].data[1], 0); // Initialize
        assert_eq!(plan.instructions[2].data[0], 26); // TransferFeeExtension
        assert_eq!(plan.instructions[2].data[1], 0); // InitializeTransferFeeConfig
        assert_eq!(plan.instructions[3].data[0], 0); // InitializeMint
        // Metadata write is last and targets the mint account.
        assert_eq!(plan.instructions[4].program_id, spl_token_2022::id());
        assert_eq!(plan.instructions[4].accounts[0].pubkey, mint);
    }

    #[test]
    fn create_token_rent_covers_mint_and_metadata() {
        let connection = MapConnection::empty();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let params = CreateTokenParams::default();
        let plan = plan_create_token(&connection, &params, &payer, &mint).unwrap();

        assert!(plan.mint_space >= Mint::LEN);
        // At least the name, symbol and uri bytes plus the TLV header.
        assert!(
            plan.metadata_space
                > params.name.len() + params.symbol.len() + params.uri.len()
        );
        assert_eq!(
            plan.rent_lamports,
            1_000 + (plan.mint_space + plan.metadata_space) as u64 * 10
        );
    }

    #[test]
    fn metadata_space_grows_with_additional_entries() {
        let connection = MapConnection::empty();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let mut params = CreateTokenParams::default();
        let base = plan_create_token(&connection, &params, &payer, &mint)
            .unwrap()
            .metadata_space;
        params
            .additional_metadata
            .push(("league".to_string(), "ncaa".to_string()));
        let grown = plan_create_token(&connection, &params, &payer, &mint)
            .unwrap()
            .metadata_space;
        assert!(grown > base);
    }

    #[test]
    fn mint_supply_creates_missing_account() {
        let connection = MapConnection::empty();
        let mint = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let plan =
            plan_mint_supply(&connection, &mint, &recipient, &payer, &payer, 1_000).unwrap();

        assert!(plan.account_created);
        assert_eq!(plan.instructions.len(), 2);
        assert_eq!(
            plan.associated_token_account,
            associated_token_address(&recipient, &mint)
        );
        assert_eq!(plan.instructions[1].data[0], 7); // MintTo
    }

    #[test]
    fn mint_supply_skips_existing_account() {
        let mint = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let ata = associated_token_address(&recipient, &mint);

        let mut connection = MapConnection::empty();
        connection.accounts.insert(
            ata,
            Account {
                lamports: 1,
                data: vec![],
                owner: spl_token_2022::id(),
                executable: false,
                rent_epoch: 0,
            },
        );
        let plan =
            plan_mint_supply(&connection, &mint, &recipient, &payer, &payer, 1_000).unwrap();

        assert!(!plan.account_created);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.instructions[0].data[0], 7);
    }

    #[test]
    fn transfer_checked_orders_source_mint_destination() {
        let mint = Pubkey::new_unique();
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let ix =
            transfer_checked_instruction(&mint, &source, &destination, &owner, 10, 9).unwrap();
        assert_eq!(ix.data[0], 12); // TransferChecked
        assert_eq!(ix.accounts[0].pubkey, source);
        assert_eq!(ix.accounts[1].pubkey, mint);
        assert_eq!(ix.accounts[2].pubkey, destination);
        assert!(ix.accounts[3].is_signer);
    }

    #[test]
    fn expected_fee_rounds_up_and_caps() {
        // 3.5% of one token at 9 decimals.
        assert_eq!(expected_transfer_fee(1_000_000_000, 350, u64::MAX), 35_000_000);
        // 3 * 350 / 10_000 = 0.105, charged as 1.
        assert_eq!(expected_transfer_fee(3, 350, u64::MAX), 1);
        // The cap wins once the proportional fee exceeds it.
        assert_eq!(expected_transfer_fee(u64::MAX, 10_000, 5_000), 5_000);
        assert_eq!(expected_transfer_fee(0, 350, 5_000), 0);
        assert_eq!(expected_transfer_fee(1_000, 0, 5_000), 0);
    }

    #[test]
    fn reads_treat_missing_accounts_as_zero() {
        let connection = MapConnection::empty();
        let address = Pubkey::new_unique();
        assert_eq!(token_balance(&connection, &address).unwrap(), 0);
        assert_eq!(withheld_amount(&connection, &address).unwrap(), 0);
    }

    #[test]
    fn missing_mint_is_an_error() {
        let connection = MapConnection::empty();
        let mint = Pubkey::new_unique();
        let err = read_mint_fee_config(&connection, &mint).unwrap_err();
        assert!(matches!(err, VarsityError::AccountNotFound(a) if a == mint));
    }
}
