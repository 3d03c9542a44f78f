#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::process::{Command, Output};
use std::sync::Mutex;

use rifa::api::RaffleApi;
use rifa::error::{Result, RifaError};
use rifa::types::{
    BuyTicketData, CreateRaffleData, CreateUserData, Raffle, RaffleStatus, Ticket, User,
};
use tempfile::TempDir;

/// Helper struct to run rifa commands in an isolated temp directory
pub struct RifaTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl RifaTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let binary_path = if cfg!(debug_assertions) {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/debug/rifa")
        } else {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/release/rifa")
        };
        let binary_path = if std::path::Path::new(binary_path).exists() {
            binary_path.to_string()
        } else {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/debug/rifa").to_string()
        };

        RifaTest {
            temp_dir,
            binary_path,
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("RIFA_ROOT")
            .env_remove("RIFA_USER_ID")
            .env_remove("RIFA_API_URL")
            .output()
            .expect("Failed to execute rifa command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".rifa");
        fs::create_dir_all(&dir).expect("Failed to create .rifa directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.temp_dir.path().join(".rifa").join("config.yaml")).ok()
    }
}

/// A raffle with `count` tickets, the given ones already sold
pub fn raffle(id: &str, count: usize, sold: &[usize]) -> Raffle {
    let mut tickets = vec![false; count];
    for &n in sold {
        tickets[n] = true;
    }
    Raffle {
        id: id.to_string(),
        description: format!("Raffle {id}"),
        ticket_price: 10.0,
        prize_value: 1000.0,
        tickets,
        status: RaffleStatus::Active,
        ..Default::default()
    }
}

/// In-memory backend recording every purchase attempt
#[derive(Default)]
pub struct FakeApi {
    raffles: Mutex<HashMap<String, Raffle>>,
    /// Numbers the backend refuses to sell
    failing: Mutex<HashSet<usize>>,
    /// Remaining `get_raffle` calls that fail
    get_failures: Mutex<usize>,
    buy_calls: Mutex<Vec<usize>>,
    get_calls: Mutex<usize>,
}

impl FakeApi {
    pub fn with_raffle(raffle: Raffle) -> Self {
        let api = Self::default();
        api.put_raffle(raffle);
        api
    }

    pub fn put_raffle(&self, raffle: Raffle) {
        self.raffles.lock().unwrap().insert(raffle.id.clone(), raffle);
    }

    pub fn fail_number(&self, number: usize) {
        self.failing.lock().unwrap().insert(number);
    }

    pub fn fail_next_gets(&self, count: usize) {
        *self.get_failures.lock().unwrap() = count;
    }

    /// Mark a ticket sold behind the client's back
    pub fn sell(&self, raffle_id: &str, number: usize) {
        if let Some(r) = self.raffles.lock().unwrap().get_mut(raffle_id) {
            r.tickets[number] = true;
        }
    }

    pub fn set_status(&self, raffle_id: &str, status: RaffleStatus) {
        if let Some(r) = self.raffles.lock().unwrap().get_mut(raffle_id) {
            r.status = status;
        }
    }

    pub fn buy_calls(&self) -> Vec<usize> {
        self.buy_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> usize {
        *self.get_calls.lock().unwrap()
    }
}

impl RaffleApi for FakeApi {
    async fn list_raffles(&self) -> Result<Vec<Raffle>> {
        Ok(self.raffles.lock().unwrap().values().cloned().collect())
    }

    async fn get_raffle(&self, id: &str) -> Result<Raffle> {
        *self.get_calls.lock().unwrap() += 1;
        {
            let mut failures = self.get_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(RifaError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }
        }
        self.raffles
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RifaError::RaffleNotFound(id.to_string()))
    }

    async fn create_raffle(&self, data: &CreateRaffleData) -> Result<Raffle> {
        let raffle = Raffle {
            id: format!("r-{}", self.raffles.lock().unwrap().len() + 1),
            creator_id: data.creator_id.clone(),
            description: data.description.clone(),
            ticket_price: data.ticket_price,
            prize_value: data.prize_value,
            ..Default::default()
        };
        self.put_raffle(raffle.clone());
        Ok(raffle)
    }

    async fn update_raffle_status(&self, id: &str, status: RaffleStatus) -> Result<Raffle> {
        self.set_status(id, status);
        self.get_raffle(id).await
    }

    async fn buy_ticket(&self, data: &BuyTicketData) -> Result<Ticket> {
        self.buy_calls.lock().unwrap().push(data.number);
        if self.failing.lock().unwrap().contains(&data.number) {
            return Err(RifaError::Api {
                status: 409,
                message: format!("ticket {} is already sold", data.number),
            });
        }
        self.sell(&data.raffle_id, data.number);
        Ok(Ticket {
            id: format!("t-{}", data.number),
            raffle_id: data.raffle_id.clone(),
            user_id: data.user_id.clone(),
            number: data.number,
            url_comprobante: data.url_comprobante.clone(),
            ..Default::default()
        })
    }

    async fn user_tickets(&self, _user_id: &str) -> Result<Vec<Ticket>> {
        Ok(Vec::new())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(Vec::new())
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        Err(RifaError::UserNotFound(id.to_string()))
    }

    async fn create_user(&self, data: &CreateUserData) -> Result<User> {
        Ok(User {
            id: "u-1".to_string(),
            name: data.name.clone(),
            phone: data.phone.clone(),
            email: data.email.clone(),
        })
    }
}
